//! Combination search: enumerate segment assignments and rank them by leftover.

pub mod collector;
pub mod config;
pub mod engine;

pub use self::collector::{Collector, TopCombinationsCollector};
pub use self::config::SearchConfig;
pub use self::engine::{CombinationSearchEngine, SearchResults};
