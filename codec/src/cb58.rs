//! CB58: base-58 with a 4-byte SHA-256 checksum suffix.
//!
//! The canonical textual form of transaction ids, serialized keys, and
//! UTXOs. The checksum is the trailing 4 bytes of `SHA-256(payload)`,
//! appended before base-58 encoding. This is not base58check: the hash is
//! a single SHA-256, not a double one, so `bs58`'s built-in checksum mode
//! does not apply.

use crate::error::CodecError;
use sha2::{Digest, Sha256};

/// Checksum suffix length in bytes.
const CHECKSUM_LEN: usize = 4;

/// Encode bytes as a CB58 string.
pub fn cb58_encode(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut payload = Vec::with_capacity(bytes.len() + CHECKSUM_LEN);
    payload.extend_from_slice(bytes);
    payload.extend_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    bs58::encode(payload).into_string()
}

/// Decode a CB58 string, verifying its checksum.
pub fn cb58_decode(s: &str) -> Result<Vec<u8>, CodecError> {
    let decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| CodecError::Base58(e.to_string()))?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(CodecError::Checksum);
    }
    let (data, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let digest = Sha256::digest(data);
    if checksum != &digest[digest.len() - CHECKSUM_LEN..] {
        return Err(CodecError::Checksum);
    }
    Ok(data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let data = b"hello world";
        let encoded = cb58_encode(data);
        assert_eq!(cb58_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn roundtrip_empty() {
        let encoded = cb58_encode(b"");
        assert_eq!(cb58_decode(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn known_vector_decodes() {
        // 32-byte transaction id in its canonical textual form.
        let s = "24jUJ9vZexUM6expyMcT48LBx27k1m7xpraoV62oSQAHdziao5";
        let bytes = cb58_decode(s).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(cb58_encode(&bytes), s);
    }

    #[test]
    fn tampered_character_fails_checksum() {
        let s = "24jUJ9vZexUM6expyMcT48LBx27k1m7xpraoV62oSQAHdziao5";
        // Swap the first character for a different alphabet character.
        let tampered = format!("3{}", &s[1..]);
        assert_eq!(cb58_decode(&tampered).unwrap_err(), CodecError::Checksum);
    }

    #[test]
    fn truncated_input_fails() {
        // Shorter than the checksum itself.
        let short = bs58::encode([1u8, 2]).into_string();
        assert_eq!(cb58_decode(&short).unwrap_err(), CodecError::Checksum);
    }

    #[test]
    fn non_alphabet_character_rejected() {
        assert!(matches!(cb58_decode("0OIl"), Err(CodecError::Base58(_))));
    }
}
