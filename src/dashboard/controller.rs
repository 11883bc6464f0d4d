use std::{
    sync::Arc,
    time::Instant,
};

use chrono::Utc;
use rayon::prelude::*;

use super::snapshot::{
    CourseOptions,
    Overview,
    Snapshot,
    WordImages,
};
use crate::{
    analysis::{
        format_optional,
        summarize,
        tokens_for_class,
    },
    core::{
        DashboardError,
        DashboardSettings,
        Review,
        SentimentClass,
    },
    dataset::Dataset,
    render::{
        render_gauge,
        DataTable,
        GaugeKind,
        TablePage,
        WordCloudRenderer,
        WordImage,
    },
};

/// Read-only handle over the loaded dataset. `select` is a pure function of its input.
pub struct Dashboard {
    dataset: Arc<Dataset>,
    word_clouds: WordCloudRenderer,
    page_size: usize,
    overview: Overview,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, settings: &DashboardSettings) -> Result<Self, DashboardError> {
        let word_clouds = WordCloudRenderer::new(settings.word_cloud.clone())?;

        let summary = summarize(dataset.reviews());
        let overview = Overview {
            average_rating_display: format_optional(summary.average_rating, ""),
            gauge: render_gauge(GaugeKind::Overview, summary.average_sentiment),
            course_count: dataset.course_options().len(),
            loaded_at: Utc::now(),
            summary,
        };

        Ok(Self { dataset, word_clouds, page_size: settings.page_size, overview })
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    pub fn course_options(&self) -> CourseOptions {
        CourseOptions {
            options: self.dataset.course_options().to_vec(),
            default: self.dataset.default_course().map(str::to_string),
        }
    }

    pub fn is_option(&self, course_id: &str) -> bool {
        self.dataset.has_course(course_id)
    }

    /// Recomputes every output for `course_id`. A course with no rows yields the empty snapshot.
    pub fn select(&self, course_id: &str) -> Snapshot {
        let start = Instant::now();
        let view = self.dataset.filter_by_course(course_id);
        let rows = view.rows();

        let summary = summarize(rows);
        let word_images = self.render_word_images(rows);

        log::debug!(
            "[Dashboard] Course {} -> {} reviews ({:.0}ms)",
            course_id,
            summary.count,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Snapshot {
            course_id: view.course_id.clone(),
            average_rating_display: summary.average_rating_display(),
            gauge: render_gauge(GaugeKind::Percentage, summary.sentiment_percentage),
            word_images,
            table: DataTable::from_reviews(rows, self.page_size),
            summary,
        }
    }

    pub fn table_page(&self, course_id: &str, page: usize) -> TablePage {
        let view = self.dataset.filter_by_course(course_id);
        DataTable::from_reviews(view.rows(), self.page_size).page(page)
    }

    fn render_word_images(&self, rows: &[&Review]) -> WordImages {
        let classes: &[SentimentClass] = &SentimentClass::ALL;
        let mut images: Vec<WordImage> = classes
            .par_iter()
            .map(|class| self.word_clouds.render(&tokens_for_class(rows, *class)))
            .collect();

        // Collected in `SentimentClass::ALL` order.
        let positive = images.pop().unwrap_or(WordImage::Empty);
        let neutral = images.pop().unwrap_or(WordImage::Empty);
        let negative = images.pop().unwrap_or(WordImage::Empty);
        WordImages { negative, neutral, positive }
    }
}
