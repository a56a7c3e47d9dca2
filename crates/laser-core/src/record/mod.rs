//! Per-player statistics and their persistence.
//!
//! - **Record book**: in-memory map of player name to cumulative record
//! - **Stores**: load/save of the whole book (JSON file, in-memory)
//! - **Aggregator**: folds finished sessions into the book and flushes it
//!
//! ## File layout
//!
//! ```json
//! {
//!   "Alice": { "score": 12, "missed": 3, "games": 2 }
//! }
//! ```

mod aggregator;
mod book;
mod store;

pub use aggregator::*;
pub use book::*;
pub use store::*;
