use chrono::{
    DateTime,
    Utc,
};
use serde::Serialize;

use crate::{
    analysis::Summary,
    core::SentimentClass,
    render::{
        DataTable,
        Gauge,
        WordImage,
    },
};

/// Dropdown contents: every distinct course, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseOptions {
    pub options: Vec<String>,
    pub default: Option<String>,
}

/// Whole-dataset header figures, computed once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub summary: Summary,
    pub average_rating_display: String,
    pub gauge: Gauge,
    pub course_count: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordImages {
    pub negative: WordImage,
    pub neutral: WordImage,
    pub positive: WordImage,
}

impl WordImages {
    pub fn get(&self, class: SentimentClass) -> &WordImage {
        match class {
            SentimentClass::Negative => &self.negative,
            SentimentClass::Neutral => &self.neutral,
            SentimentClass::Positive => &self.positive,
        }
    }

    pub fn non_empty_count(&self) -> usize {
        SentimentClass::ALL.iter().filter(|c| !self.get(**c).is_empty()).count()
    }
}

/// Every output for one selected course, computed together in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub course_id: String,
    pub summary: Summary,
    pub average_rating_display: String,
    pub gauge: Gauge,
    pub word_images: WordImages,
    pub table: DataTable,
}
