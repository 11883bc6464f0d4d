pub mod errors;
pub mod http;
pub mod models;
pub mod settings;

pub use errors::DashboardError;
pub use models::{
    Review,
    SentimentClass,
};
pub use settings::{
    DashboardSettings,
    WordCloudSettings,
};
