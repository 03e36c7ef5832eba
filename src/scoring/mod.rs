pub mod recommendation;
pub mod report;
pub mod scorer;
pub mod stats;

pub use recommendation::{Area, Recommendation, Severity};
pub use report::Report;
pub use scorer::LampQualityScorer;
pub use stats::AggregateStats;
