//! Data ingestion and output
//!
//! Schedule scraping, the team directory and CSV export.

pub mod export;
pub mod schedule;
pub mod teams;

pub use export::FeatureRow;
pub use schedule::ScheduleScraper;
pub use teams::TeamDirectory;
