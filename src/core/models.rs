use serde::{
    Deserialize,
    Serialize,
};

/// Upstream sentiment classification, stored in the dataset as -1, 0 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentClass {
    Negative,
    Neutral,
    Positive,
}

impl SentimentClass {
    pub const ALL: [SentimentClass; 3] =
        [SentimentClass::Negative, SentimentClass::Neutral, SentimentClass::Positive];

    pub fn from_indicator(value: i64) -> Option<Self> {
        match value {
            -1 => Some(SentimentClass::Negative),
            0 => Some(SentimentClass::Neutral),
            1 => Some(SentimentClass::Positive),
            _ => None,
        }
    }

    pub fn indicator(&self) -> i8 {
        match self {
            SentimentClass::Negative => -1,
            SentimentClass::Neutral => 0,
            SentimentClass::Positive => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentClass::Negative => "Negative",
            SentimentClass::Neutral => "Neutral",
            SentimentClass::Positive => "Positive",
        }
    }
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: String,
    pub course_id: String,
    pub raw_text: String,
    pub translated_text: String,
    pub translated_text_no_stopwords: String, // Token source for the word images
    pub rating: f64,
    pub sentiment: SentimentClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_mapping() {
        for class in SentimentClass::ALL {
            assert_eq!(SentimentClass::from_indicator(class.indicator() as i64), Some(class));
        }
        assert_eq!(SentimentClass::from_indicator(2), None);
        assert_eq!(SentimentClass::from_indicator(-2), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SentimentClass::Negative.to_string(), "Negative");
        assert_eq!(SentimentClass::Neutral.label(), "Neutral");
        assert_eq!(SentimentClass::Positive.label(), "Positive");
    }
}
