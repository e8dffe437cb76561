//! Cryptographic primitives for the Avalanche client workspace.
//!
//! - **secp256k1** recoverable ECDSA for transaction signing
//! - **SHA-256** for digests (the signing pre-image is the SHA-256 of the
//!   unsigned transaction bytes)
//! - Address derivation: `RIPEMD-160(SHA-256(compressed public key))`

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::address_from_pubkey;
pub use error::CryptoError;
pub use hash::{sha256, sha256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed};
pub use sign::{recover, sign, verify};
