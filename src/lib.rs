pub mod analysis;
pub mod core;
pub mod dashboard;
pub mod dataset;
pub mod persistence;
pub mod render;
pub mod server;

pub use crate::core::{
    DashboardError,
    DashboardSettings,
};
pub use dashboard::Dashboard;
pub use dataset::{
    load_dataset,
    Dataset,
};
