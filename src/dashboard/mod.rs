pub mod controller;
pub mod snapshot;

pub use controller::Dashboard;
pub use snapshot::{
    CourseOptions,
    Overview,
    Snapshot,
    WordImages,
};
