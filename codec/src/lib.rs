//! Wire and string codecs for the Avalanche client workspace.
//!
//! - Big-endian primitive serialization (`ByteWriter` / `ByteReader`)
//! - CB58: base-58 with a 4-byte SHA-256 checksum suffix, the textual form
//!   of transaction ids, keys, and UTXOs
//! - Bech32 addresses with a network HRP and chain prefix (`X-avax1...`)

pub mod address;
pub mod bytes;
pub mod cb58;
pub mod error;

pub use address::{address_to_string, decode_address, encode_address, parse_address_string};
pub use bytes::{ByteReader, ByteWriter};
pub use cb58::{cb58_decode, cb58_encode};
pub use error::CodecError;
