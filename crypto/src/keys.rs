//! secp256k1 key pair generation.

use crate::error::CryptoError;
use avax_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{All, Secp256k1, SecretKey};
use std::sync::OnceLock;

pub(crate) fn secp() -> &'static Secp256k1<All> {
    static CTX: OnceLock<Secp256k1<All>> = OnceLock::new();
    CTX.get_or_init(Secp256k1::new)
}

/// Generate a new secp256k1 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    loop {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        // Rejection-sample the scalar range; a draw outside it is ~2^-128.
        if let Ok(pair) = keypair_from_private(PrivateKey(bytes)) {
            return pair;
        }
    }
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let secret = SecretKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidKey)?;
    let public = secp256k1::PublicKey::from_secret_key(secp(), &secret);
    Ok(KeyPair {
        public: PublicKey(public.serialize()),
        private,
    })
}

/// Derive a child key pair deterministically from seed material.
///
/// The private scalar is the SHA-256 of the seed, re-hashed until it lands
/// in the curve's scalar range.
pub fn keypair_from_seed(seed: &[u8]) -> KeyPair {
    let mut digest = crate::hash::sha256(seed);
    loop {
        match keypair_from_private(PrivateKey(digest)) {
            Ok(pair) => return pair,
            Err(_) => digest = crate::hash::sha256(&digest),
        }
    }
}
