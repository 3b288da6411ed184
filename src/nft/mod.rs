//! nftables set population.
//!
//! - [`cli`] - running `nft` and parsing its output
//! - [`set`] - set elements, batching, and the [`NftSet`] sink

mod cli;
mod set;

pub use cli::{parse_tables, run, run_args, NftTable};
pub use set::{interval_elements, load_intervals, NftSet, SetElement, SetSink};
