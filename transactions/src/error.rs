use avax_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid transaction configuration: {0}")]
    Config(String),

    #[error("unsupported codec version {0}")]
    CodecVersion(u16),
}
