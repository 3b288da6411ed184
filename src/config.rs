//! Command line options and fixed settings.

use crate::processing::MergeStrategy;
use clap::Parser;
use std::path::PathBuf;

/// Elements submitted per nftables batch before flushing.
pub const BATCH_SIZE: usize = 1000;

// A start/end pair must never be split across two batches.
const _: () = assert!(BATCH_SIZE % 2 == 0);

/// Table searched for the target set when none is given.
pub const DEFAULT_TABLE: &str = "filter";

/// The nftables command line tool.
pub const NFT_BIN: &str = "nft";

/// Largest stdout accepted from an external command, in bytes.
pub const MAX_COMMAND_OUTPUT: usize = 500_000;

/// Reads the network intervals for the countries given as ISO 3166-1 alpha-2
/// codes from a MaxMind GeoIP2/GeoLite2 country database.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Args {
    /// MaxMind DB file with the IP ranges for countries
    #[arg(short, long, env = "GEOIP_NFTSET_DB")]
    pub db: PathBuf,

    /// ISO 3166-1 alpha-2 country codes, e.g. NZ AU
    #[arg(required = true, value_name = "COUNTRY")]
    pub countries: Vec<String>,

    /// Print the resulting intervals
    #[arg(short, long)]
    pub print: bool,

    /// Print the matching CIDRs as found, without merging
    #[arg(short, long)]
    pub list: bool,

    /// Print the resulting intervals as JSON
    #[arg(long)]
    pub json: bool,

    /// Add the intervals to this nftables set
    #[arg(short, long)]
    pub set: Option<String>,

    /// Name of the nftables table the set is in
    #[arg(short, long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// How intervals are merged
    #[arg(long, value_enum, default_value_t = MergeStrategy::Sweep)]
    pub strategy: MergeStrategy,

    /// Print debug logs (very verbose)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The target set, when both a set and a table name are given.
    pub fn target_set(&self) -> Option<(&str, &str)> {
        match self.set.as_deref() {
            Some(set) if !set.is_empty() && !self.table.is_empty() => {
                Some((self.table.as_str(), set))
            }
            _ => None,
        }
    }

    /// Whether the merged intervals are needed at all.
    pub fn wants_intervals(&self) -> bool {
        self.print || self.json || self.target_set().is_some() || !self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "geoip-nftset",
            "--db",
            "GeoLite2-Country.mmdb",
            "-p",
            "--set",
            "geo_block",
            "NZ",
            "AU",
        ])
        .unwrap();
        assert_eq!(args.db, PathBuf::from("GeoLite2-Country.mmdb"));
        assert_eq!(args.countries, vec!["NZ", "AU"]);
        assert!(args.print);
        assert!(!args.verbose);
        assert_eq!(args.table, DEFAULT_TABLE);
        assert_eq!(args.strategy, MergeStrategy::Sweep);
        assert_eq!(args.target_set(), Some(("filter", "geo_block")));
        assert!(args.wants_intervals());
    }

    #[test]
    fn test_countries_required() {
        let result = Args::try_parse_from(["geoip-nftset", "--db", "x.mmdb"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_strategy_and_list_only() {
        let args = Args::try_parse_from([
            "geoip-nftset",
            "-d",
            "x.mmdb",
            "--strategy",
            "incremental",
            "--list",
            "--table",
            "",
            "--set",
            "geo",
            "FR",
        ])
        .unwrap();
        assert_eq!(args.strategy, MergeStrategy::Incremental);
        assert_eq!(args.target_set(), None);
        assert!(!args.wants_intervals());
    }
}
