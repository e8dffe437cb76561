//! 20-byte account addresses.
//!
//! An address is the RIPEMD-160 of the SHA-256 of a compressed secp256k1
//! public key. Output address lists and signer sets are always kept in
//! strictly ascending byte order, so `Address` carries a byte-lexicographic
//! `Ord`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte address hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Sort ascending and drop duplicates, producing a canonical address list.
    pub fn sort_and_dedup(mut addrs: Vec<Address>) -> Vec<Address> {
        addrs.sort_unstable();
        addrs.dedup();
        addrs
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
