//! Loading intervals into a named nftables set.
//!
//! nftables stores an interval as two elements: the range start, and the
//! first address after the range flagged as the interval end.

use super::cli::{parse_tables, run, run_args};
use crate::config::{BATCH_SIZE, NFT_BIN};
use crate::models::{Address, Interval};
use colored::Colorize;
use itertools::Itertools;
use std::error::Error;

/// One element of an interval set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetElement {
    /// Address in network byte order.
    pub key: [u8; 4],
    /// Marks the exclusive end of an interval.
    pub interval_end: bool,
}

/// The start and end elements for an interval.
pub fn interval_elements(interval: &Interval) -> [SetElement; 2] {
    [
        SetElement {
            key: interval.lower().octets(),
            interval_end: false,
        },
        SetElement {
            key: interval.upper().octets(),
            interval_end: true,
        },
    ]
}

/// Destination for set elements, committed one batch at a time.
pub trait SetSink {
    /// Name used in log lines.
    fn name(&self) -> String;

    /// Queue elements for the next flush.
    fn add_elements(&mut self, elements: &[SetElement]) -> Result<(), Box<dyn Error>>;

    /// Commit queued elements, returning once they are applied.
    fn flush(&mut self) -> Result<(), Box<dyn Error>>;
}

/// Add every interval to `sink` in batches of [`BATCH_SIZE`] elements,
/// flushing after each batch.
///
/// Returns the number of elements added.
pub fn load_intervals<S: SetSink + ?Sized>(
    sink: &mut S,
    intervals: &[Interval],
) -> Result<usize, Box<dyn Error>> {
    let elements: Vec<SetElement> = intervals.iter().flat_map(interval_elements).collect();
    log::info!(
        "#Start load_intervals() {} intervals => {} elements into @{}",
        intervals.len(),
        elements.len(),
        sink.name()
    );

    for (i, batch) in elements.chunks(BATCH_SIZE).enumerate() {
        let start = i * BATCH_SIZE;
        log::debug!(
            "Adding elements from {} to {} to @{}",
            start,
            start + batch.len(),
            sink.name()
        );
        sink.add_elements(batch)?;
        sink.flush()?;
    }
    Ok(elements.len())
}

/// An existing nftables set, written to through the `nft` command.
#[derive(Debug)]
pub struct NftSet {
    family: String,
    table: String,
    name: String,
    pending: Vec<SetElement>,
}

impl NftSet {
    /// Find the set `set_name` in the table `table_name`.
    ///
    /// The table name is matched case-insensitively, in any family. The set
    /// must already exist; it is never created or altered.
    pub fn locate(table_name: &str, set_name: &str) -> Result<NftSet, Box<dyn Error>> {
        let tables = parse_tables(&run(&format!("{NFT_BIN} list tables"))?);
        log::debug!("nft tables: {:?}", tables);

        let table = tables
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(table_name))
            .ok_or_else(|| {
                format!("could not find a set named {set_name:?} in table {table_name:?}")
            })?;

        let set = NftSet::new(&table.family, &table.name, set_name);
        run_args(&set.command(&["-t", "list", "set"])).map_err(|e| {
            format!("could not find a set named {set_name:?} in table {table_name:?}: {e}")
        })?;
        log::info!("Found set {}", set.path().green());
        Ok(set)
    }

    pub fn new(family: &str, table: &str, name: &str) -> NftSet {
        NftSet {
            family: family.to_string(),
            table: table.to_string(),
            name: name.to_string(),
            pending: Vec::new(),
        }
    }

    /// `<family> <table> <set>`, for log lines.
    pub fn path(&self) -> String {
        format!("{} {} {}", self.family, self.table, self.name)
    }

    /// `nft <verb...> <family> <table> <set>` with each name kept as one
    /// argument.
    fn command(&self, verb: &[&str]) -> Vec<String> {
        std::iter::once(NFT_BIN)
            .chain(verb.iter().copied())
            .chain([self.family.as_str(), self.table.as_str(), self.name.as_str()])
            .map(str::to_string)
            .collect()
    }

    /// The `nft add element` arguments for a run of start/end element pairs.
    ///
    /// Each pair is written as the inclusive range `start-(end - 1)`.
    pub fn element_command(
        &self,
        elements: &[SetElement],
    ) -> Result<Vec<String>, Box<dyn Error>> {
        if elements.len() % 2 != 0 {
            return Err(format!("odd number of interval elements: {}", elements.len()).into());
        }
        let mut ranges = Vec::with_capacity(elements.len() / 2);
        for (start, end) in elements.iter().tuples::<(_, _)>() {
            if start.interval_end || !end.interval_end {
                return Err(format!("unpaired interval elements {start:?} {end:?}").into());
            }
            let first = Address::from(start.key);
            let last = Address::from(end.key)
                .predecessor()
                .filter(|last| *last >= first)
                .ok_or_else(|| format!("empty interval {first} - {}", Address::from(end.key)))?;
            if first == last {
                ranges.push(first.to_string());
            } else {
                ranges.push(format!("{first}-{last}"));
            }
        }
        let mut cmd = self.command(&["add", "element"]);
        cmd.push(format!("{{ {} }}", ranges.iter().join(", ")));
        Ok(cmd)
    }
}

impl SetSink for NftSet {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn add_elements(&mut self, elements: &[SetElement]) -> Result<(), Box<dyn Error>> {
        self.pending.extend_from_slice(elements);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let cmd = self.element_command(&self.pending)?;
        run_args(&cmd)?;
        log::debug!("Flushed {} elements to {}", self.pending.len(), self.path());
        self.pending.clear();
        Ok(())
    }
}
