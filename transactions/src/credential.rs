//! Credentials: the signatures attached to each input once a transaction is
//! signed.

use crate::error::TxError;
use crate::put_count;
use avax_codec::{ByteReader, ByteWriter, CodecError};
use avax_types::Signature;

/// Type id of a SECP credential.
pub const SECP_CREDENTIAL_ID: u32 = 0x0000_0009;

/// An ordered list of 65-byte recoverable signatures, one per signature slot
/// of the corresponding input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub signatures: Vec<Signature>,
}

impl Credential {
    pub fn new(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(SECP_CREDENTIAL_ID);
        put_count(w, self.signatures.len())?;
        for sig in &self.signatures {
            w.put_fixed(sig.as_bytes());
        }
        Ok(())
    }

    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let type_id = r.get_u32()?;
        if type_id != SECP_CREDENTIAL_ID {
            return Err(CodecError::UnknownType(type_id).into());
        }
        let count = r.get_u32()? as usize;
        let mut signatures = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            signatures.push(Signature(r.get_fixed::<65>()?));
        }
        Ok(Self::new(signatures))
    }
}
