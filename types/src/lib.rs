//! Fundamental types for the Avalanche client workspace.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: 32-byte chain identifiers, 20-byte addresses, and the network
//! table that maps a network to its address HRP.

pub mod address;
pub mod ids;
pub mod keys;
pub mod network;

pub use address::Address;
pub use ids::{AssetId, BlockchainId, TxId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::{ChainAlias, NetworkId};
