//! Merge the GeoIP networks of selected countries into the fewest IPv4
//! intervals, and print them or load them into an nftables set.

pub mod config;
pub mod geodb;
pub mod logging;
pub mod models;
pub mod nft;
pub mod output;
pub mod processing;

use config::Args;
use geodb::MaxmindSource;
use nft::{load_intervals, NftSet};
use processing::{collect_intervals, list_matching_cidrs, CountryFilter};
use std::error::Error;

/// Run one pass over the database as requested on the command line.
pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let filter = CountryFilter::new(&args.countries)?;
    let source = MaxmindSource::open(&args.db)?;

    if args.list {
        let stdout = std::io::stdout();
        let count = list_matching_cidrs(source.ranges()?, &filter, &mut stdout.lock())?;
        log::info!("Listed {count} CIDRs");
    }
    if !args.wants_intervals() {
        return Ok(());
    }

    let intervals = collect_intervals(source.ranges()?, &filter, args.strategy)?;

    if let Some((table, set)) = args.target_set() {
        let mut set = NftSet::locate(table, set)?;
        let added = load_intervals(&mut set, &intervals)?;
        log::info!("Added {added} elements to {}", set.path());
    }
    if args.print {
        output::print_intervals(&intervals)?;
    }
    if args.json {
        output::print_intervals_json(&intervals)?;
    }
    Ok(())
}
