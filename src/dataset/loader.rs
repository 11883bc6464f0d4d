use std::{
    collections::HashSet,
    fs::File,
    io::{
        BufReader,
        Read,
    },
    time::Instant,
};

use csv::{
    ReaderBuilder,
    StringRecord,
};

use super::Dataset;
use crate::core::{
    http,
    DashboardError,
    DashboardSettings,
    Review,
    SentimentClass,
};

pub const COL_REVIEW_ID: &str = "ReviewID";
pub const COL_REVIEW: &str = "Review";
pub const COL_TRANSLATED: &str = "translated_review";
pub const COL_RATING: &str = "Label";
pub const COL_CLASSIFICATION: &str = "roberta_classification";
pub const COL_TOKENS: &str = "translated_review_removed_stopwords";
pub const COL_COURSE_ID: &str = "CourseId";

struct ColumnIndex {
    review_id: usize,
    review: usize,
    translated: usize,
    rating: usize,
    classification: usize,
    tokens: usize,
    course_id: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, DashboardError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            review_id: find(COL_REVIEW_ID)?,
            review: find(COL_REVIEW)?,
            translated: find(COL_TRANSLATED)?,
            rating: find(COL_RATING)?,
            classification: find(COL_CLASSIFICATION)?,
            tokens: find(COL_TOKENS)?,
            course_id: find(COL_COURSE_ID)?,
        })
    }
}

/// Fetches (or reads) the configured dataset and validates every row. Any failure here is fatal.
pub fn load_dataset(settings: &DashboardSettings) -> Result<Dataset, DashboardError> {
    let start = Instant::now();
    let source = settings.dataset_source.as_str();

    let dataset = if http::is_remote(source) {
        log::info!("[Dataset] Downloading {}", source);
        let client = http::http_client(settings.http_timeout_secs)?;
        let body = http::download_bytes(&client, source)?;
        parse_csv(body.as_slice(), settings.skip_malformed_rows)?
    } else {
        log::info!("[Dataset] Reading {}", source);
        let file = File::open(source).map_err(|e| {
            DashboardError::Custom(format!("Failed to open dataset {}: {}", source, e))
        })?;
        parse_csv(BufReader::new(file), settings.skip_malformed_rows)?
    };

    log::info!(
        "[Dataset] Loaded {} reviews across {} courses ({:.1}s)",
        dataset.len(),
        dataset.course_options().len(),
        start.elapsed().as_secs_f32()
    );
    if dataset.skipped_rows() > 0 {
        log::warn!("[Dataset] Skipped {} malformed rows", dataset.skipped_rows());
    }

    Ok(dataset)
}

pub fn parse_csv<R: Read>(reader: R, skip_malformed: bool) -> Result<Dataset, DashboardError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).flexible(false).from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;

    let mut reviews = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut skipped = 0;

    for (idx, record) in csv_reader.records().enumerate() {
        // Header is line 1, so data row idx sits on line idx + 2 unless the record says otherwise.
        let fallback_line = idx as u64 + 2;

        let parsed = record.map_err(DashboardError::from).and_then(|record| {
            let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
            let review = parse_record(&record, &columns, line)?;
            if seen_ids.insert(review.review_id.clone()) {
                Ok(review)
            } else {
                Err(DashboardError::MalformedRow {
                    line,
                    reason: format!("duplicate {} '{}'", COL_REVIEW_ID, review.review_id),
                })
            }
        });

        match parsed {
            Ok(review) => reviews.push(review),
            Err(e) if skip_malformed => {
                log::warn!("[Dataset] Skipping row: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Dataset::with_skipped(reviews, skipped)
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<Review, DashboardError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let review_id = field(columns.review_id).trim().to_string();
    if review_id.is_empty() {
        return Err(DashboardError::MalformedRow {
            line,
            reason: format!("empty {}", COL_REVIEW_ID),
        });
    }

    let course_id = field(columns.course_id).trim().to_string();
    if course_id.is_empty() {
        return Err(DashboardError::MalformedRow {
            line,
            reason: format!("empty {}", COL_COURSE_ID),
        });
    }

    let rating = parse_rating(field(columns.rating))
        .ok_or_else(|| DashboardError::MalformedRow {
            line,
            reason: format!("non-numeric {} '{}'", COL_RATING, field(columns.rating)),
        })?;

    let sentiment = parse_classification(field(columns.classification)).ok_or_else(|| {
        DashboardError::MalformedRow {
            line,
            reason: format!(
                "{} '{}' is not one of -1, 0, 1",
                COL_CLASSIFICATION,
                field(columns.classification)
            ),
        }
    })?;

    Ok(Review {
        review_id,
        course_id,
        raw_text: field(columns.review).to_string(),
        translated_text: field(columns.translated).to_string(),
        translated_text_no_stopwords: field(columns.tokens).trim().to_string(),
        rating,
        sentiment,
    })
}

fn parse_rating(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// Integer columns sometimes arrive as "1.0" after a float round-trip upstream.
fn parse_classification(value: &str) -> Option<SentimentClass> {
    let value = value.trim();
    let indicator = match value.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let v = value.parse::<f64>().ok()?;
            if !v.is_finite() || v.fract() != 0.0 {
                return None;
            }
            v as i64
        }
    };
    SentimentClass::from_indicator(indicator)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "ReviewID,Review,translated_review,Label,roberta_classification,translated_review_removed_stopwords,CourseId\n";

    fn csv_with(rows: &[&str]) -> String {
        let mut csv = HEADER.to_string();
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }

    #[test]
    fn test_parse_valid_rows() {
        let csv = csv_with(&[
            "1,Ótimo curso,Great course,5,1,great course,C1",
            "2,\"Ok, mas lento\",\"Ok, but slow\",3,0,ok slow,C1",
            "3,Ruim,Bad,1,-1,bad,C2",
        ]);
        let dataset = parse_csv(csv.as_bytes(), false).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.course_options(), &["C1".to_string(), "C2".to_string()]);

        let second = &dataset.reviews()[1];
        assert_eq!(second.raw_text, "Ok, mas lento");
        assert_eq!(second.translated_text, "Ok, but slow");
        assert_eq!(second.rating, 3.0);
        assert_eq!(second.sentiment, SentimentClass::Neutral);
    }

    #[test]
    fn test_extra_columns_and_column_order_are_irrelevant() {
        let csv = "CourseId,extra,Label,roberta_classification,ReviewID,Review,translated_review,translated_review_removed_stopwords\n\
                   C9,x,4.5,1.0,a,r,t,tok\n";
        let dataset = parse_csv(csv.as_bytes(), false).unwrap();
        let review = &dataset.reviews()[0];
        assert_eq!(review.course_id, "C9");
        assert_eq!(review.rating, 4.5);
        assert_eq!(review.sentiment, SentimentClass::Positive);
        assert_eq!(review.translated_text_no_stopwords, "tok");
    }

    #[test]
    fn test_missing_column() {
        let csv = "ReviewID,Review,translated_review,Label,CourseId\n1,a,b,5,C1\n";
        match parse_csv(csv.as_bytes(), false) {
            Err(DashboardError::MissingColumn(name)) => assert_eq!(name, COL_CLASSIFICATION),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_classification_is_rejected() {
        let csv = csv_with(&["1,a,b,5,1,tok,C1", "2,a,b,5,2,tok,C1"]);
        match parse_csv(csv.as_bytes(), false) {
            Err(DashboardError::MalformedRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("'2'"), "{}", reason);
            }
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_rating_is_rejected() {
        let csv = csv_with(&["1,a,b,five,1,tok,C1"]);
        assert!(matches!(
            parse_csv(csv.as_bytes(), false),
            Err(DashboardError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_id_reports_record_line_after_multiline_review() {
        let csv = csv_with(&["1,\"first line\nsecond line\nthird line\",t,5,1,tok,C1", "1,a,b,4,0,dup,C1"]);
        match parse_csv(csv.as_bytes(), false) {
            Err(DashboardError::MalformedRow { line, reason }) => {
                assert_eq!(line, 5);
                assert!(reason.contains("duplicate ReviewID '1'"), "{}", reason);
            }
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_malformed_rows() {
        let csv = csv_with(&[
            "1,a,b,5,1,tok,C1",
            "2,a,b,5,0.5,tok,C1",
            "3,a,b,NaN,1,tok,C1",
            "1,a,b,4,0,dup,C1",
            "4,a,b,2,-1,tok,C2",
        ]);
        let dataset = parse_csv(csv.as_bytes(), true).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped_rows(), 3);
        assert_eq!(dataset.reviews()[1].review_id, "4");
    }

    #[test]
    fn test_empty_token_text_is_allowed() {
        let csv = csv_with(&["1,a,b,5,1,,C1"]);
        let dataset = parse_csv(csv.as_bytes(), false).unwrap();
        assert_eq!(dataset.reviews()[0].translated_text_no_stopwords, "");
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        assert!(matches!(parse_csv(HEADER.as_bytes(), false), Err(DashboardError::EmptyDataset)));
    }

    #[test]
    fn test_load_dataset_from_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv_with(&["1,a,b,5,1,tok,C1"]).as_bytes()).unwrap();

        let settings = DashboardSettings {
            dataset_source: file.path().to_string_lossy().to_string(),
            ..DashboardSettings::default()
        };
        let dataset = load_dataset(&settings).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let settings = DashboardSettings {
            dataset_source: "/definitely/not/here.csv".to_string(),
            ..DashboardSettings::default()
        };
        assert!(load_dataset(&settings).is_err());
    }
}
