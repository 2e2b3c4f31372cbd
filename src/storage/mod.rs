//! Persistence of finished calculations.
//!
//! Stores keep [`CalculationRecord`]s under opaque string ids. Two backends
//! are provided: an in-memory map and a directory of JSON files.

pub mod file;
pub mod memory;
pub mod record;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use record::*;
pub use traits::*;
