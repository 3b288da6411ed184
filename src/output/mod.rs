//! Output formatting for interval data.
//!
//! - [`terminal`] - plain text listing
//! - [`json`] - JSON listing

mod json;
mod terminal;

pub use json::{intervals_to_json, print_intervals_json};
pub use terminal::{print_intervals, write_intervals};
