//! JSON output of merged intervals.

use crate::models::Interval;
use std::error::Error;

/// Serialize the intervals as a JSON array of `{"lower", "upper"}` objects.
pub fn intervals_to_json(intervals: &[Interval]) -> Result<String, Box<dyn Error>> {
    serde_json::to_string_pretty(intervals)
        .map_err(|e| format!("Error serializing JSON: {e}").into())
}

/// Print the intervals to stdout as JSON.
pub fn print_intervals_json(intervals: &[Interval]) -> Result<(), Box<dyn Error>> {
    println!("{}", intervals_to_json(intervals)?);
    Ok(())
}
