use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid recovery id")]
    Recovery,

    #[error("invalid private key")]
    InvalidKey,

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("invalid public key encoding")]
    InvalidPublicKey,
}
