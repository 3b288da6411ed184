//! Plain text output.
//!
//! One interval per line, formatted as `<lower> - <upper>`.

use crate::models::Interval;
use std::error::Error;
use std::io::Write;

/// Write the intervals to `out`, one per line.
pub fn write_intervals<W: Write>(out: &mut W, intervals: &[Interval]) -> std::io::Result<()> {
    for interval in intervals {
        writeln!(out, "{interval}")?;
    }
    Ok(())
}

/// Print the intervals to stdout.
pub fn print_intervals(intervals: &[Interval]) -> Result<(), Box<dyn Error>> {
    log::info!("#Start print_intervals() count={}", intervals.len());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_intervals(&mut out, intervals)?;
    out.flush()?;
    Ok(())
}
