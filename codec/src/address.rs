//! Bech32 address strings.
//!
//! Textual form: `<chain>-<bech32(hrp, 20-byte hash)>`, e.g.
//! `X-avax1qpe87vz8p6cd9g5kmwn0akwfaflfw5wlfzfklr`. The HRP names the
//! network (`avax`, `fuji`, `local`); the chain prefix names the chain the
//! address lives on.

use crate::error::CodecError;
use avax_types::{address::ADDRESS_LEN, Address, ChainAlias, NetworkId};
use bech32::{FromBase32, ToBase32, Variant};

/// Encode a 20-byte address as bech32 under the given HRP.
pub fn encode_address(hrp: &str, addr: &Address) -> Result<String, CodecError> {
    bech32::encode(hrp, addr.as_bytes().to_base32(), Variant::Bech32)
        .map_err(|e| CodecError::Bech32(e.to_string()))
}

/// Decode a bech32 address, enforcing the expected HRP.
pub fn decode_address(expected_hrp: &str, s: &str) -> Result<Address, CodecError> {
    let (hrp, data, variant) =
        bech32::decode(s).map_err(|e| CodecError::Bech32(e.to_string()))?;
    if variant != Variant::Bech32 {
        return Err(CodecError::Bech32("bech32m variant not accepted".into()));
    }
    if hrp != expected_hrp {
        return Err(CodecError::Bech32(format!(
            "hrp mismatch: expected {expected_hrp}, got {hrp}"
        )));
    }
    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| CodecError::Bech32(e.to_string()))?;
    let arr: [u8; ADDRESS_LEN] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CodecError::Bech32(format!("address must be {ADDRESS_LEN} bytes")))?;
    Ok(Address::new(arr))
}

/// Full textual form of an address: `X-avax1...`.
pub fn address_to_string(network: NetworkId, chain: ChainAlias, addr: &Address) -> String {
    // The HRPs are fixed lowercase ASCII, so encoding cannot fail.
    let encoded = encode_address(network.hrp(), addr).unwrap_or_default();
    format!("{}-{}", chain.prefix(), encoded)
}

/// Parse a chain-qualified address string back into its chain and bytes.
pub fn parse_address_string(
    network: NetworkId,
    s: &str,
) -> Result<(ChainAlias, Address), CodecError> {
    let (prefix, rest) = s
        .split_once('-')
        .ok_or_else(|| CodecError::Bech32("missing chain prefix".into()))?;
    let chain = ChainAlias::from_prefix(prefix)
        .ok_or_else(|| CodecError::Bech32(format!("unknown chain prefix {prefix}")))?;
    let addr = decode_address(network.hrp(), rest)?;
    Ok((chain, addr))
}
