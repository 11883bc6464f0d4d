use serde::{
    Deserialize,
    Serialize,
};

use crate::persistence;

pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_DATASET_SOURCE: &str = "https://raw.githubusercontent.com/danrfiuza/sentiment-analysis-dashboard/main/course_reviews_with_score.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudSettings {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub background: String,
}

impl Default for WordCloudSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            max_words: 200,
            min_font_size: 10.0,
            max_font_size: 64.0,
            background: "white".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub dataset_source: String, // URL or local path
    pub bind_address: String,
    pub port: u16,
    pub page_size: usize,
    pub word_cloud: WordCloudSettings,
    pub skip_malformed_rows: bool,
    pub http_timeout_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            dataset_source: DEFAULT_DATASET_SOURCE.to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 8060,
            page_size: 5,
            word_cloud: WordCloudSettings::default(),
            skip_malformed_rows: false,
            http_timeout_secs: 120,
        }
    }
}

impl DashboardSettings {
    /// Loads the persisted settings, writing the defaults out on first run so they can be edited.
    pub fn load() -> Self {
        if !persistence::data_file_exists(SETTINGS_FILE) {
            let defaults = Self::default();
            if let Err(e) = persistence::save_json(&defaults, SETTINGS_FILE) {
                log::warn!("Could not write default settings: {}", e);
            }
            return defaults;
        }

        persistence::load_json_or_default::<Self>(SETTINGS_FILE).sanitized()
    }

    // Zero sizes would make pagination and rendering meaningless.
    fn sanitized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = 5;
        }
        if self.word_cloud.width == 0 || self.word_cloud.height == 0 {
            self.word_cloud.width = 400;
            self.word_cloud.height = 200;
        }
        if self.word_cloud.max_font_size < self.word_cloud.min_font_size {
            std::mem::swap(&mut self.word_cloud.min_font_size, &mut self.word_cloud.max_font_size);
        }
        self
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: DashboardSettings =
            serde_json::from_str(r#"{ "port": 9000, "word_cloud": { "width": 800 } }"#).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.word_cloud.width, 800);
        assert_eq!(settings.word_cloud.height, 200);
        assert_eq!(settings.dataset_source, DEFAULT_DATASET_SOURCE);
    }

    #[test]
    fn test_sanitized_fixes_degenerate_values() {
        let mut settings = DashboardSettings::default();
        settings.page_size = 0;
        settings.word_cloud.min_font_size = 80.0;
        settings.word_cloud.max_font_size = 12.0;
        let settings = settings.sanitized();
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.word_cloud.min_font_size, 12.0);
        assert_eq!(settings.word_cloud.max_font_size, 80.0);
    }

    #[test]
    fn test_listen_address() {
        assert_eq!(DashboardSettings::default().listen_address(), "127.0.0.1:8060");
    }
}
