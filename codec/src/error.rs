use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("checksum mismatch")]
    Checksum,

    #[error("base-58 decode failed: {0}")]
    Base58(String),

    #[error("bech32 error: {0}")]
    Bech32(String),

    #[error("unknown type id {0:#010x}")]
    UnknownType(u32),

    #[error("unexpected end of input: wanted {wanted} more bytes, {remaining} left")]
    UnexpectedEof { wanted: usize, remaining: usize },

    #[error("{0} trailing bytes after decode")]
    TrailingBytes(usize),

    #[error("length {0} does not fit the wire length field")]
    BadLength(usize),

    #[error("invalid utf-8 in wire string")]
    Utf8,
}
