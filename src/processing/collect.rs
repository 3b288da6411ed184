//! Country filtering and interval collection.
//!
//! Streams `(CIDR, country)` records, keeps those of the requested
//! countries, and feeds them to a [`MergeEngine`].

use super::merge::{MergeEngine, MergeStrategy};
use crate::geodb::GeoRange;
use crate::models::Interval;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::io::Write;

/// Set of requested ISO 3166-1 alpha-2 country codes.
#[derive(Debug, Clone)]
pub struct CountryFilter {
    codes: BTreeSet<String>,
}

impl CountryFilter {
    /// Build a filter from user supplied codes. Codes are upper-cased and
    /// de-duplicated; at least one is required.
    pub fn new<I, S>(codes: I) -> Result<CountryFilter, Box<dyn Error>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: BTreeSet<String> = codes
            .into_iter()
            .map(|c| c.as_ref().trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            return Err("need to specify at least one ISO country code".into());
        }
        Ok(CountryFilter { codes })
    }

    pub fn matches(&self, country: Option<&str>) -> bool {
        country.is_some_and(|c| self.codes.contains(c))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

/// IPv4 records assigned to one of the filter's countries.
fn matching<'a, I>(
    ranges: I,
    filter: &'a CountryFilter,
) -> impl Iterator<Item = Result<GeoRange, Box<dyn Error>>> + 'a
where
    I: IntoIterator<Item = Result<GeoRange, Box<dyn Error>>>,
    I::IntoIter: 'a,
{
    ranges.into_iter().filter(move |range| match range {
        Ok(range) => range.is_ipv4() && filter.matches(range.country.as_deref()),
        Err(_) => true,
    })
}

/// Build the merged intervals for all records matching `filter`.
///
/// CIDRs that do not form a usable interval are skipped. The first record
/// error stops the scan and is returned.
pub fn collect_intervals<I>(
    ranges: I,
    filter: &CountryFilter,
    strategy: MergeStrategy,
) -> Result<Vec<Interval>, Box<dyn Error>>
where
    I: IntoIterator<Item = Result<GeoRange, Box<dyn Error>>>,
{
    let mut engine = MergeEngine::new(strategy);
    log::info!(
        "#Start collect_intervals() countries={:?} strategy={}",
        filter.codes().collect::<Vec<_>>(),
        engine.strategy()
    );
    let mut per_country: BTreeMap<String, usize> = BTreeMap::new();
    let mut skipped = 0;

    for range in matching(ranges, filter) {
        let range = range?;
        let country = range.country.unwrap_or_default();
        log::debug!("subnet {} assigned to {}", range.cidr, country);
        *per_country.entry(country).or_default() += 1;

        let interval = match Interval::from_cidr(&range.cidr) {
            Ok(interval) => interval,
            Err(e) => {
                log::debug!("subnet {} skipped: {e}", range.cidr);
                skipped += 1;
                continue;
            }
        };
        if let Some(merged) = engine.insert(interval) {
            log::debug!("subnet {} merged into {merged}", range.cidr);
        }
    }

    for (country, count) in &per_country {
        log::info!("country {country}: {count} subnets");
    }
    let intervals = engine.finish();
    log::info!(
        "Got {} subnets ({skipped} skipped) => {} intervals covering {} addresses",
        per_country.values().sum::<usize>(),
        intervals.len(),
        intervals.iter().map(Interval::size).sum::<u64>()
    );
    Ok(intervals)
}

/// Write every IPv4 CIDR matching `filter`, one per line, as found.
///
/// Returns the number of lines written.
pub fn list_matching_cidrs<I, W>(
    ranges: I,
    filter: &CountryFilter,
    out: &mut W,
) -> Result<usize, Box<dyn Error>>
where
    I: IntoIterator<Item = Result<GeoRange, Box<dyn Error>>>,
    W: Write,
{
    let mut count = 0;
    for range in matching(ranges, filter) {
        writeln!(out, "{}", range?.cidr)?;
        count += 1;
    }
    Ok(count)
}
