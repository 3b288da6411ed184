//! Half-open address interval built from a CIDR block.
//!
//! CIDR boundaries rarely line up across neighbouring blocks of different
//! prefix lengths, and a GeoIP database describes one contiguous allocation
//! with many of them. As integer ranges they can be combined regardless of
//! alignment, which is also how nftables stores interval sets.

use super::{Address, Cidr};
use serde::Serialize;
use std::error::Error;

/// Address range `[lower, upper)`: `lower` is included, `upper` is not.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize)]
pub struct Interval {
    lower: Address,
    upper: Address,
}

impl Interval {
    /// Build the interval covered by a CIDR string such as "10.0.0.0/8".
    ///
    /// Host routes (/32), blocks written with the zero address, and blocks
    /// whose bounds are not valid addresses are rejected. The top block of
    /// the address space is rejected too, as no address follows its
    /// broadcast address.
    pub fn from_cidr(cidr: &str) -> Result<Interval, Box<dyn Error>> {
        let cidr: Cidr = cidr.parse()?;
        if cidr.is_host_route() {
            return Err(format!("{cidr} is a host route, not a range").into());
        }
        if !Address::from(cidr.addr).is_valid() {
            return Err(format!("{cidr} uses the zero address").into());
        }

        let lower = Address::from(cidr.network()?);
        if !lower.is_valid() {
            return Err(format!("invalid network address {lower} for {cidr}").into());
        }
        let broadcast = Address::from(cidr.broadcast()?);
        if !broadcast.is_valid() {
            return Err(format!("invalid broadcast address {broadcast} for {cidr}").into());
        }
        let upper = broadcast
            .successor()
            .ok_or_else(|| format!("no address follows broadcast {broadcast} of {cidr}"))?;

        Ok(Interval { lower, upper })
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> Address {
        self.lower
    }

    /// Exclusive upper bound.
    pub fn upper(&self) -> Address {
        self.upper
    }

    /// Number of addresses covered.
    pub fn size(&self) -> u64 {
        u64::from(self.upper.value()) - u64::from(self.lower.value())
    }

    /// True when the two intervals overlap or touch, so that their union
    /// is one contiguous range.
    pub fn can_join(&self, other: &Interval) -> bool {
        self.lower.max(other.lower) <= self.upper.min(other.upper)
    }

    /// Smallest interval covering both, if they can be joined.
    pub fn join(&self, other: &Interval) -> Option<Interval> {
        if !self.can_join(other) {
            return None;
        }
        Some(Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        })
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} - {}", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(cidr: &str) -> Interval {
        Interval::from_cidr(cidr).unwrap_or_else(|e| panic!("{cidr}: {e}"))
    }

    #[test]
    fn test_from_cidr_bounds() {
        let cases = [
            ("0.0.1.0/24", "0.0.1.0", "0.0.2.0"),
            ("192.160.0.0/12", "192.160.0.0", "192.176.0.0"),
            ("10.0.0.0/8", "10.0.0.0", "11.0.0.0"),
            ("223.252.192.0/18", "223.252.192.0", "223.253.0.0"),
            ("10.0.0.5/8", "10.0.0.0", "11.0.0.0"),
        ];
        for (cidr, lower, upper) in cases {
            let n = interval(cidr);
            assert_eq!(n.lower().to_string(), lower, "lower of {cidr}");
            assert_eq!(n.upper().to_string(), upper, "upper of {cidr}");
            assert!(n.lower() < n.upper());
        }
    }

    #[test]
    fn test_from_cidr_rejects() {
        assert!(Interval::from_cidr("192.168.11.12/32").is_err());
        assert!(Interval::from_cidr("0.0.0.0/0").is_err());
        assert!(Interval::from_cidr("0.0.0.0/8").is_err());
        // Host part is non-zero but the network address is 0.0.0.0.
        assert!(Interval::from_cidr("0.0.0.1/8").is_err());
        assert!(Interval::from_cidr("not a cidr").is_err());
        assert!(Interval::from_cidr("2001:db8::/32").is_err());
        assert_eq!(
            Interval::from_cidr("255.255.255.0/24")
                .unwrap_err()
                .to_string(),
            "no address follows broadcast 255.255.255.255 of 255.255.255.0/24"
        );
    }

    #[test]
    fn test_display_and_size() {
        let n = interval("10.0.0.0/8");
        assert_eq!(n.to_string(), "10.0.0.0 - 11.0.0.0");
        assert_eq!(n.size(), 1 << 24);
        assert_eq!(interval("1.2.3.4/31").size(), 2);
    }

    #[test]
    fn test_can_join() {
        let cases = [
            ("0.0.1.0/24", "0.0.1.0/24", true),
            ("192.160.0.0/12", "192.176.0.0/24", true),
            ("192.176.0.0/24", "192.160.0.0/12", true),
            ("10.0.0.0/8", "10.0.0.0/16", true),
            ("42.0.0.0/24", "42.0.0.0/16", true),
            ("223.252.192.0/24", "223.252.194.0/24", false),
            ("10.0.0.0/8", "1.0.0.0/16", false),
        ];
        for (a, b, expected) in cases {
            let (a_n, b_n) = (interval(a), interval(b));
            assert_eq!(a_n.can_join(&b_n), expected, "can_join({a}, {b})");
            assert_eq!(b_n.can_join(&a_n), expected, "can_join({b}, {a})");
        }
    }

    #[test]
    fn test_join() {
        let cases = [
            ("0.0.1.0/24", "0.0.1.0/24", "0.0.1.0", "0.0.2.0"),
            ("192.160.0.0/12", "192.176.0.0/24", "192.160.0.0", "192.176.1.0"),
            ("192.176.0.0/24", "192.160.0.0/12", "192.160.0.0", "192.176.1.0"),
            ("10.0.0.0/8", "10.0.0.0/16", "10.0.0.0", "11.0.0.0"),
            ("42.1.0.0/24", "42.1.0.0/16", "42.1.0.0", "42.2.0.0"),
        ];
        for (a, b, lower, upper) in cases {
            let joined = interval(a).join(&interval(b)).unwrap();
            assert_eq!(joined.lower().to_string(), lower, "join({a}, {b})");
            assert_eq!(joined.upper().to_string(), upper, "join({a}, {b})");
        }
        assert!(interval("223.252.192.0/24")
            .join(&interval("223.252.194.0/24"))
            .is_none());
    }

    #[test]
    fn test_join_idempotent() {
        let a = interval("192.160.0.0/12");
        let b = interval("192.176.0.0/24");
        let ab = a.join(&b).unwrap();
        assert_eq!(ab.join(&a), Some(ab));
        assert_eq!(ab.join(&b), Some(ab));
        assert_eq!(a.join(&a), Some(a));
    }

    #[test]
    fn test_serialize() {
        let n = interval("42.1.0.0/16");
        assert_eq!(
            serde_json::to_string(&n).unwrap(),
            r#"{"lower":"42.1.0.0","upper":"42.2.0.0"}"#
        );
    }
}
