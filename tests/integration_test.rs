//! Integration tests for geoip-nftset
//!
//! These tests run the workflow from database records to set elements,
//! with an in-memory record stream and a recording set.

use geoip_nftset::{
    geodb::{GeoRange, MaxmindSource},
    models::Interval,
    nft::{load_intervals, SetElement, SetSink},
    output::write_intervals,
    processing::{collect_intervals, CountryFilter, MergeStrategy},
};
use std::error::Error;

const TEST_DB: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/country-test.mmdb");

fn records() -> Vec<Result<GeoRange, Box<dyn Error>>> {
    [
        ("1.0.0.0/24", Some("AU")),
        ("1.0.1.0/24", Some("CN")),
        ("1.0.2.0/23", Some("CN")),
        ("1.0.4.0/22", Some("AU")),
        ("1.0.8.0/21", Some("AU")),
        ("1.0.16.0/20", Some("JP")),
        ("1.0.32.0/19", Some("AU")),
        ("1.0.64.0/18", Some("NZ")),
        ("1.0.128.0/17", Some("AU")),
        ("10.0.0.0/8", Some("NZ")),
        ("10.0.0.0/16", Some("NZ")),
        ("192.168.11.12/32", Some("NZ")),
        ("255.255.255.0/24", Some("NZ")),
        ("2001:db8::/32", Some("NZ")),
    ]
    .iter()
    .map(|(cidr, country)| Ok(GeoRange::new(cidr, *country)))
    .collect()
}

#[derive(Default)]
struct RecordingSink {
    pending: Vec<SetElement>,
    batches: Vec<Vec<SetElement>>,
}

impl SetSink for RecordingSink {
    fn name(&self) -> String {
        "test".to_string()
    }

    fn add_elements(&mut self, elements: &[SetElement]) -> Result<(), Box<dyn Error>> {
        self.pending.extend_from_slice(elements);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        self.batches.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

fn lines(intervals: &[Interval]) -> Vec<String> {
    intervals.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_full_workflow_sweep() {
    let filter = CountryFilter::new(["au", "nz"]).expect("valid countries");
    let intervals =
        collect_intervals(records(), &filter, MergeStrategy::Sweep).expect("collect intervals");

    assert_eq!(
        lines(&intervals),
        vec![
            "1.0.0.0 - 1.0.1.0",
            "1.0.4.0 - 1.0.16.0",
            "1.0.32.0 - 1.1.0.0",
            "10.0.0.0 - 11.0.0.0",
        ]
    );

    let mut sink = RecordingSink::default();
    let added = load_intervals(&mut sink, &intervals).expect("load intervals");
    assert_eq!(added, 8);
    assert_eq!(sink.batches.len(), 1);
    assert_eq!(sink.batches[0][2].key, [1, 0, 4, 0]);
    assert_eq!(sink.batches[0][3].key, [1, 0, 16, 0]);
    assert!(sink.batches[0][3].interval_end);

    let mut out = Vec::new();
    write_intervals(&mut out, &intervals).expect("write intervals");
    assert!(String::from_utf8(out)
        .unwrap()
        .starts_with("1.0.0.0 - 1.0.1.0\n1.0.4.0 - 1.0.16.0\n"));
}

#[test]
fn test_strategies_cover_the_same_addresses() {
    let filter = CountryFilter::new(["AU", "NZ"]).unwrap();
    let total = |strategy| -> u64 {
        collect_intervals(records(), &filter, strategy)
            .unwrap()
            .iter()
            .map(Interval::size)
            .sum()
    };
    let sweep = total(MergeStrategy::Sweep);
    assert_eq!(sweep, total(MergeStrategy::Rescan));
    assert_eq!(sweep, total(MergeStrategy::Incremental));
    assert_eq!(sweep, 256 + 3 * 1024 + 224 * 256 + (1 << 24));
}

#[test]
fn test_single_country_inclusion() {
    let filter = CountryFilter::new(["NZ"]).unwrap();
    for strategy in [
        MergeStrategy::Incremental,
        MergeStrategy::Rescan,
        MergeStrategy::Sweep,
    ] {
        let intervals = collect_intervals(
            vec![
                Ok(GeoRange::new("10.0.0.0/8", Some("NZ"))),
                Ok(GeoRange::new("10.0.0.0/16", Some("NZ"))),
            ],
            &filter,
            strategy,
        )
        .unwrap();
        assert_eq!(lines(&intervals), vec!["10.0.0.0 - 11.0.0.0"]);
    }
}

#[test]
fn test_database_to_intervals() {
    let source = MaxmindSource::open(TEST_DB).expect("open test database");
    let filter = CountryFilter::new(["au"]).unwrap();
    let intervals = collect_intervals(
        source.ranges().expect("iterate networks"),
        &filter,
        MergeStrategy::Sweep,
    )
    .expect("collect intervals");
    assert_eq!(
        lines(&intervals),
        vec!["1.0.0.0 - 1.0.1.0", "1.0.4.0 - 1.0.16.0"]
    );

    let filter = CountryFilter::new(["GB", "US"]).unwrap();
    let intervals =
        collect_intervals(source.ranges().unwrap(), &filter, MergeStrategy::Rescan).unwrap();
    assert_eq!(
        lines(&intervals),
        vec![
            "81.2.69.142 - 81.2.69.144",
            "81.2.69.160 - 81.2.69.192",
            "216.160.83.56 - 216.160.83.64",
        ]
    );
}
