//! # Lightcalc
//!
//! Works out how to assemble fixed-length lighting segments, plus an
//! optional power cord, to cover a target length with as little leftover as
//! possible.
//!
//! ## Features
//!
//! - Exhaustive depth-first search over a small segment catalog
//! - Ranking by leftover with stable, catalog-ordered tie-breaking
//! - Perimeter input from width and height
//! - Saved calculations in memory or as JSON files, with share links
//!
//! ```
//! use lightcalc::search::{CombinationSearchEngine, SearchConfig};
//!
//! let engine = CombinationSearchEngine::new(SearchConfig::default()).unwrap();
//! let results = engine.search(2400, true).unwrap();
//! assert!(results.combinations.len() <= 3);
//! ```

pub mod catalog;
pub mod cli;
pub mod combination;
pub mod error;
pub mod input;
pub mod search;
pub mod storage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
