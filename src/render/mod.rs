pub mod gauge;
pub mod table;
pub mod word_cloud;

pub use gauge::{
    render_gauge,
    Gauge,
    GaugeKind,
};
pub use table::{
    DataTable,
    TableColumn,
    TablePage,
    TableRow,
    TABLE_COLUMNS,
};
pub use word_cloud::{
    WordCloudRenderer,
    WordFrequency,
    WordImage,
};

pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("plain"), "plain");
        assert_eq!(xml_escape("a<b & \"c\"'s"), "a&lt;b &amp; &quot;c&quot;&apos;s");
    }
}
