//! Geo-tagged IP range source.
//!
//! - [`reader`] - MaxMind DB country database iteration

mod reader;

pub use reader::{GeoRange, MaxmindSource};
