//! Pure reductions over a set of reviews.
//!
//! Every function accepts either owned rows (`&[Review]`) or the borrowed rows of a
//! [`FilteredView`](crate::dataset::FilteredView) (`&[&Review]`). Averages over an empty set
//! are `None` rather than a division by zero; callers display them as `N/A`.

use std::borrow::Borrow;

use serde::Serialize;

use crate::core::{
    Review,
    SentimentClass,
};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl ClassCounts {
    pub fn total(&self) -> usize {
        self.negative + self.neutral + self.positive
    }

    pub fn get(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Negative => self.negative,
            SentimentClass::Neutral => self.neutral,
            SentimentClass::Positive => self.positive,
        }
    }

    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.negative, self.neutral, self.positive)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub average_rating: Option<f64>,
    pub sentiment_percentage: Option<f64>,
    pub average_sentiment: Option<f64>,
    pub class_counts: ClassCounts,
}

impl Summary {
    pub fn average_rating_display(&self) -> String {
        format_optional(self.average_rating, "")
    }

    pub fn sentiment_percentage_display(&self) -> String {
        format_optional(self.sentiment_percentage, "%")
    }
}

pub fn format_optional(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn reviews<R: Borrow<Review>>(rows: &[R]) -> impl Iterator<Item = &Review> {
    rows.iter().map(|r| r.borrow())
}

pub fn count<R: Borrow<Review>>(rows: &[R]) -> usize {
    rows.len()
}

pub fn average_rating<R: Borrow<Review>>(rows: &[R]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = reviews(rows).map(|r| r.rating).sum();
    Some(sum / rows.len() as f64)
}

/// Share of positive reviews, in percent.
pub fn sentiment_percentage<R: Borrow<Review>>(rows: &[R]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let positives = count_class(rows, SentimentClass::Positive);
    Some(positives as f64 / rows.len() as f64 * 100.0)
}

/// Mean of the signed class indicators, in [-1, 1].
pub fn average_sentiment<R: Borrow<Review>>(rows: &[R]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: i64 = reviews(rows).map(|r| r.sentiment.indicator() as i64).sum();
    Some(sum as f64 / rows.len() as f64)
}

pub fn class_counts<R: Borrow<Review>>(rows: &[R]) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for review in reviews(rows) {
        match review.sentiment {
            SentimentClass::Negative => counts.negative += 1,
            SentimentClass::Neutral => counts.neutral += 1,
            SentimentClass::Positive => counts.positive += 1,
        }
    }
    counts
}

fn count_class<R: Borrow<Review>>(rows: &[R], class: SentimentClass) -> usize {
    reviews(rows).filter(|r| r.sentiment == class).count()
}

/// Stop-word-free text of every row in `class`, space-joined in row order. Empty when none match.
pub fn tokens_for_class<R: Borrow<Review>>(rows: &[R], class: SentimentClass) -> String {
    reviews(rows)
        .filter(|r| r.sentiment == class)
        .map(|r| r.translated_text_no_stopwords.as_str())
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn summarize<R: Borrow<Review>>(rows: &[R]) -> Summary {
    Summary {
        count: count(rows),
        average_rating: average_rating(rows),
        sentiment_percentage: sentiment_percentage(rows),
        average_sentiment: average_sentiment(rows),
        class_counts: class_counts(rows),
    }
}
