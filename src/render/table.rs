use std::borrow::Borrow;

use serde::Serialize;

use crate::core::Review;

/// A displayed column: its header text and the `TableRow` field it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub header: &'static str,
    pub field: &'static str,
}

const fn column(header: &'static str, field: &'static str) -> TableColumn {
    TableColumn { header, field }
}

pub const TABLE_COLUMNS: [TableColumn; 5] = [
    column("ID", "id"),
    column("Review", "review"),
    column("Translated Review", "translated_review"),
    column("Rating", "rating"),
    column("Classification", "classification"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub review: String,
    pub translated_review: String,
    pub rating: f64,
    pub classification: String,
}

impl From<&Review> for TableRow {
    fn from(review: &Review) -> Self {
        Self {
            id: review.review_id.clone(),
            review: review.raw_text.clone(),
            translated_review: review.translated_text.clone(),
            rating: review.rating,
            classification: review.sentiment.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub page: usize, // Zero-based
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: &'static [TableColumn],
    pub page_size: usize,
    pub rows: Vec<TableRow>,
}

impl DataTable {
    pub fn from_reviews<R: Borrow<Review>>(reviews: &[R], page_size: usize) -> Self {
        Self {
            columns: &TABLE_COLUMNS,
            page_size: page_size.max(1),
            rows: reviews.iter().map(|r| TableRow::from(r.borrow())).collect(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    pub fn page(&self, page: usize) -> TablePage {
        let start = page.saturating_mul(self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        TablePage {
            page,
            page_size: self.page_size,
            page_count: self.page_count(),
            total_rows: self.rows.len(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}
