pub mod aggregator;

pub use aggregator::{
    average_rating,
    average_sentiment,
    class_counts,
    count,
    format_optional,
    sentiment_percentage,
    summarize,
    tokens_for_class,
    ClassCounts,
    Summary,
    NOT_AVAILABLE,
};
