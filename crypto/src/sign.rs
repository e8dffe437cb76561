//! Recoverable ECDSA over SHA-256 digests.
//!
//! Signatures are 65 bytes: the 64-byte compact form followed by a one-byte
//! recovery id. The compact form is low-S; `verify` normalizes before
//! checking so a re-encoded high-S copy of a valid signature cannot verify
//! differently than the bytes this module emits.

use crate::error::CryptoError;
use crate::hash::sha256;
use crate::keys::secp;
use avax_types::{PrivateKey, PublicKey, Signature};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SecretKey};

/// Sign the SHA-256 digest of `msg`, returning a 65-byte recoverable signature.
pub fn sign(private: &PrivateKey, msg: &[u8]) -> Result<Signature, CryptoError> {
    let secret = SecretKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidKey)?;
    let digest = sha256(msg);
    let message =
        Message::from_digest_slice(&digest).map_err(|_| CryptoError::InvalidSignature)?;
    let recoverable = secp().sign_ecdsa_recoverable(&message, &secret);
    let (recovery_id, compact) = recoverable.serialize_compact();

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&compact);
    bytes[64] = recovery_id.to_i32() as u8;
    Ok(Signature(bytes))
}

/// Recover the signer's public key from a message and a 65-byte signature.
pub fn recover(msg: &[u8], sig: &Signature) -> Result<PublicKey, CryptoError> {
    let recovery_id =
        RecoveryId::from_i32(i32::from(sig.0[64])).map_err(|_| CryptoError::Recovery)?;
    let recoverable = RecoverableSignature::from_compact(&sig.0[..64], recovery_id)
        .map_err(|_| CryptoError::InvalidSignature)?;
    let digest = sha256(msg);
    let message =
        Message::from_digest_slice(&digest).map_err(|_| CryptoError::InvalidSignature)?;
    let public = secp()
        .recover_ecdsa(&message, &recoverable)
        .map_err(|_| CryptoError::Recovery)?;
    Ok(PublicKey(public.serialize()))
}

/// Verify a 65-byte signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify(msg: &[u8], sig: &Signature, public: &PublicKey) -> bool {
    let Ok(key) = secp256k1::PublicKey::from_slice(&public.0) else {
        return false;
    };
    let Ok(mut standard) = secp256k1::ecdsa::Signature::from_compact(&sig.0[..64]) else {
        return false;
    };
    standard.normalize_s();
    let digest = sha256(msg);
    let Ok(message) = Message::from_digest_slice(&digest) else {
        return false;
    };
    secp().verify_ecdsa(&message, &standard, &key).is_ok()
}
