//! Address and interval models.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Cidr`] - IPv4 block in CIDR notation, with mask arithmetic
//! - [`Address`] - IPv4 host address as a 32-bit ordinal
//! - [`Interval`] - half-open address range built from a CIDR block

mod address;
mod interval;
mod ipv4;

// Re-export public types
pub use address::Address;
pub use interval::Interval;
pub use ipv4::{broadcast_addr, cut_addr, get_cidr_mask, host_mask, Cidr, MAX_LENGTH};
