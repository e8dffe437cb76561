//! Wallet core for the Avalanche client workspace.
//!
//! Provides everything a wallet application needs to turn an unspent-output
//! inventory and an intent into signature-ready bytes:
//! - Key management: an address-to-keypair chain with bulk signing
//! - UTXO inventory: an indexed set with by-address and by-asset queries
//! - Coin selection: a deterministic multi-asset solver
//! - Transaction builders for the X, P, and C chain dialects

pub mod builder;
pub mod error;
pub mod keychain;
pub mod spend;
pub mod utxo;

pub use builder::TxBuilder;
pub use error::WalletError;
pub use keychain::KeyChain;
pub use spend::{get_minimum_spendable, AssetAmount, AssetAmountDestination, SpendResult};
pub use utxo::{Utxo, UtxoSet};
