pub mod loader;

use std::collections::HashSet;

use crate::core::{
    DashboardError,
    Review,
};

pub use loader::{
    load_dataset,
    parse_csv,
};

/// The immutable review set plus the course options derived from it at load time.
#[derive(Debug, Clone)]
pub struct Dataset {
    reviews: Vec<Review>,
    course_options: Vec<String>, // First-seen order, no duplicates
    known_courses: HashSet<String>,
    skipped_rows: usize,
}

impl Dataset {
    pub fn new(reviews: Vec<Review>) -> Result<Self, DashboardError> {
        Self::with_skipped(reviews, 0)
    }

    pub(crate) fn with_skipped(
        reviews: Vec<Review>,
        skipped_rows: usize,
    ) -> Result<Self, DashboardError> {
        if reviews.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }

        let mut known_courses = HashSet::new();
        let mut course_options = Vec::new();
        for review in &reviews {
            if known_courses.insert(review.course_id.clone()) {
                course_options.push(review.course_id.clone());
            }
        }

        Ok(Self { reviews, course_options, known_courses, skipped_rows })
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn course_options(&self) -> &[String] {
        &self.course_options
    }

    /// The dropdown's initial value.
    pub fn default_course(&self) -> Option<&str> {
        self.course_options.first().map(String::as_str)
    }

    pub fn has_course(&self, course_id: &str) -> bool {
        self.known_courses.contains(course_id)
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn filter_by_course(&self, course_id: &str) -> FilteredView<'_> {
        FilteredView {
            course_id: course_id.to_string(),
            rows: self.reviews.iter().filter(|r| r.course_id == course_id).collect(),
        }
    }
}

/// Borrowed subset of the dataset for one selected course.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub course_id: String,
    pub rows: Vec<&'a Review>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a Review] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::{
        Review,
        SentimentClass,
    };

    pub fn review(id: &str, course: &str, rating: f64, class: i64, tokens: &str) -> Review {
        Review {
            review_id: id.to_string(),
            course_id: course.to_string(),
            raw_text: format!("raw {}", id),
            translated_text: format!("translated {}", id),
            translated_text_no_stopwords: tokens.to_string(),
            rating,
            sentiment: SentimentClass::from_indicator(class).expect("valid class in fixture"),
        }
    }

    /// Four reviews of C1 with ratings [5,3,1,2] and classes [1,0,-1,1], plus one of C2.
    pub fn sample_reviews() -> Vec<Review> {
        vec![
            review("1", "C1", 5.0, 1, "great course"),
            review("2", "C1", 3.0, 0, "okay pacing"),
            review("3", "C1", 1.0, -1, "boring lectures"),
            review("4", "C1", 2.0, 1, "great teacher"),
            review("5", "C2", 4.0, 1, "useful examples"),
        ]
    }
}
