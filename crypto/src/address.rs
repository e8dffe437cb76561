//! Address derivation from public keys.
//!
//! An address is `RIPEMD-160(SHA-256(compressed public key))`, 20 bytes.

use avax_types::{Address, PublicKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Derive the 20-byte address hash of a compressed secp256k1 public key.
pub fn address_from_pubkey(public: &PublicKey) -> Address {
    let sha = Sha256::digest(public.as_bytes());
    let ripe = Ripemd160::digest(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripe);
    Address::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derivation_is_deterministic() {
        let pair = keypair_from_seed(&[1u8; 32]);
        assert_eq!(
            address_from_pubkey(&pair.public),
            address_from_pubkey(&pair.public)
        );
    }

    #[test]
    fn different_keys_different_addresses() {
        let k1 = generate_keypair();
        let k2 = generate_keypair();
        assert_ne!(
            address_from_pubkey(&k1.public),
            address_from_pubkey(&k2.public)
        );
    }
}
