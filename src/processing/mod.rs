//! Interval processing logic.
//!
//! This module contains the business logic that turns database records into
//! merged intervals:
//! - [`collect`] - country filtering and interval collection
//! - [`merge`] - the merge engine and its strategies

mod collect;
mod merge;

// Re-export public functions
pub use collect::{collect_intervals, list_matching_cidrs, CountryFilter};
pub use merge::{merge_intervals, MergeEngine, MergeStrategy};
