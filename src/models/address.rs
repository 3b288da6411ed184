//! IPv4 host address as a 32-bit ordinal.
//!
//! Ranges are far simpler to compare and combine as integers than as byte
//! slices, so every bound of an [`Interval`](super::Interval) is an
//! [`Address`].

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr};

/// IPv4 host address held as its big-endian integer value.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Address {
    value: u32,
}

impl Address {
    /// Build an [`Address`] from a host address.
    ///
    /// Returns `None` unless the address is IPv4. An IPv4-mapped IPv6
    /// address (`::ffff:a.b.c.d`) is unwrapped to its IPv4 form.
    pub fn from_host_address(ip: IpAddr) -> Option<Address> {
        match ip {
            IpAddr::V4(v4) => Some(Address::from(v4)),
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(Address::from),
        }
    }

    /// Parse a textual host address, e.g. "10.0.0.22".
    pub fn parse(s: &str) -> Option<Address> {
        s.trim()
            .parse::<IpAddr>()
            .ok()
            .and_then(Address::from_host_address)
    }

    /// The ordinal value of the address.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Canonical 4-byte big-endian representation.
    pub fn octets(&self) -> [u8; 4] {
        self.value.to_be_bytes()
    }

    /// The address as a standard library `Ipv4Addr`.
    pub fn to_ipv4(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.value)
    }

    /// An address is usable as an interval bound unless it is 0.0.0.0.
    pub fn is_valid(&self) -> bool {
        !self.octets().iter().all(|b| *b == 0) && self.value != 0
    }

    /// The address immediately after this one.
    ///
    /// 255.255.255.255 has no successor, and neither has an invalid address.
    pub fn successor(&self) -> Option<Address> {
        if !self.is_valid() {
            return None;
        }
        self.value
            .checked_add(1)
            .map(Address::from)
            .filter(Address::is_valid)
    }

    /// The address immediately before this one, if any.
    pub fn predecessor(&self) -> Option<Address> {
        self.value.checked_sub(1).map(Address::from)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Address { value }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address {
            value: u32::from(ip),
        }
    }
}

impl From<[u8; 4]> for Address {
    fn from(octets: [u8; 4]) -> Self {
        Address {
            value: u32::from_be_bytes(octets),
        }
    }
}

impl From<Address> for Ipv4Addr {
    fn from(address: Address) -> Self {
        address.to_ipv4()
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Box<dyn Error>;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let octets: [u8; 4] = bytes
            .try_into()
            .map_err(|_| format!("invalid IPv4 address length: {} bytes", bytes.len()))?;
        Ok(Address::from(octets))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_ipv4())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid IPv4 address: {s}")))
    }
}
