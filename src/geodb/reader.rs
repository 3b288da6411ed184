//! MaxMind DB reader yielding the IPv4 networks of a country database.

use ipnetwork::{IpNetwork, Ipv4Network};
use maxminddb::{Reader, Within};
use serde::Deserialize;
use std::error::Error;
use std::net::Ipv4Addr;
use std::path::Path;

/// One network of the database and the country it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRange {
    /// Network in CIDR notation, e.g. "1.0.0.0/24".
    pub cidr: String,
    /// ISO 3166-1 alpha-2 code, if the record carries one.
    pub country: Option<String>,
}

impl GeoRange {
    pub fn new(cidr: &str, country: Option<&str>) -> GeoRange {
        GeoRange {
            cidr: cidr.to_string(),
            country: country.map(str::to_string),
        }
    }

    pub fn is_ipv4(&self) -> bool {
        !self.cidr.contains(':')
    }
}

// Only the fields we read out of a GeoIP2/GeoLite2 Country record.
#[derive(Deserialize, Debug)]
struct CountryRecord {
    country: Option<Country>,
}

#[derive(Deserialize, Debug)]
struct Country {
    iso_code: Option<String>,
}

/// Country database opened from a `.mmdb` file.
pub struct MaxmindSource {
    reader: Reader<Vec<u8>>,
}

impl MaxmindSource {
    /// Open the database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<MaxmindSource, Box<dyn Error>> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path)
            .map_err(|e| format!("Error opening database {}: {e}", path.display()))?;
        log::info!(
            "Opened {} type={} ip_version={} nodes={}",
            path.display(),
            reader.metadata.database_type,
            reader.metadata.ip_version,
            reader.metadata.node_count
        );
        Ok(MaxmindSource { reader })
    }

    /// Iterate every network of the IPv4 address space, in database order.
    ///
    /// Any item error ends the run; the caller should stop at the first one.
    pub fn ranges(
        &self,
    ) -> Result<impl Iterator<Item = Result<GeoRange, Box<dyn Error>>> + '_, Box<dyn Error>> {
        let ipv4_space = IpNetwork::V4(Ipv4Network::new(Ipv4Addr::UNSPECIFIED, 0)?);
        let within: Within<CountryRecord, _> = self
            .reader
            .within(ipv4_space)
            .map_err(|e| format!("Error reading networks: {e}"))?;

        Ok(within.map(|item| -> Result<GeoRange, Box<dyn Error>> {
            let item = item.map_err(|e| format!("Error iterating networks: {e}"))?;
            Ok(GeoRange {
                cidr: item.ip_net.to_string(),
                country: item.info.country.and_then(|c| c.iso_code),
            })
        }))
    }
}
