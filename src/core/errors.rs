use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("Dataset contains no reviews")]
    EmptyDataset,

    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("DashboardError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for DashboardError {
    fn from(error: std::io::Error) -> Self {
        DashboardError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(error: reqwest::Error) -> Self {
        DashboardError::Reqwest(Box::new(error))
    }
}

impl From<csv::Error> for DashboardError {
    fn from(error: csv::Error) -> Self {
        DashboardError::Csv(Box::new(error))
    }
}
