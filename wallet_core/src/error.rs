use avax_codec::CodecError;
use avax_crypto::CryptoError;
use avax_transactions::TxError;
use avax_types::{Address, AssetId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("insufficient funds for asset {asset_id}: need {needed}, have {available}")]
    InsufficientFunds {
        asset_id: AssetId,
        needed: u64,
        available: u64,
    },

    #[error("no key for address {0}")]
    MissingKey(Address),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
