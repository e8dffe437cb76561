//! The unified unsigned transaction and its signed form.
//!
//! An unsigned transaction serializes as
//! `codecVersion:u16 ‖ typeID:u32 ‖ body`; the SHA-256 of those bytes is the
//! signing pre-image. A signed transaction appends one credential per input.
//! There is no partially-signed state: signing happens in one pass over a
//! keychain holding every required key.

use crate::base_tx::{BaseTx, BASE_TX_ID};
use crate::create_asset_tx::{CreateAssetTx, CREATE_ASSET_TX_ID};
use crate::credential::Credential;
use crate::error::TxError;
use crate::evm::{EvmExportTx, EvmImportTx, EVM_EXPORT_TX_ID, EVM_IMPORT_TX_ID};
use crate::export_tx::{ExportTx, AVM_EXPORT_TX_ID, PLATFORM_EXPORT_TX_ID};
use crate::import_tx::{ImportTx, AVM_IMPORT_TX_ID, PLATFORM_IMPORT_TX_ID};
use crate::operation_tx::{OperationTx, OPERATION_TX_ID};
use crate::{put_count, Dialect, CODEC_VERSION};
use avax_codec::{ByteReader, ByteWriter, CodecError};
use avax_crypto::sha256;
use avax_types::{Address, TxId};

/// A fully built, not yet signed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnsignedTx {
    Base(BaseTx),
    CreateAsset(CreateAssetTx),
    Operation(OperationTx),
    Import(ImportTx),
    Export(ExportTx),
    EvmImport(EvmImportTx),
    EvmExport(EvmExportTx),
}

impl UnsignedTx {
    pub fn type_id(&self) -> u32 {
        match self {
            Self::Base(_) => BASE_TX_ID,
            Self::CreateAsset(_) => CREATE_ASSET_TX_ID,
            Self::Operation(_) => OPERATION_TX_ID,
            Self::Import(tx) => tx.type_id(),
            Self::Export(tx) => tx.type_id(),
            Self::EvmImport(_) => EVM_IMPORT_TX_ID,
            Self::EvmExport(_) => EVM_EXPORT_TX_ID,
        }
    }

    /// Serialize the full unsigned transaction.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let mut w = ByteWriter::with_capacity(256);
        w.put_u16(CODEC_VERSION);
        w.put_u32(self.type_id());
        match self {
            Self::Base(tx) => tx.write_body(&mut w)?,
            Self::CreateAsset(tx) => tx.write_body(&mut w)?,
            Self::Operation(tx) => tx.write_body(&mut w)?,
            Self::Import(tx) => tx.write_body(&mut w)?,
            Self::Export(tx) => tx.write_body(&mut w)?,
            Self::EvmImport(tx) => tx.write_body(&mut w)?,
            Self::EvmExport(tx) => tx.write_body(&mut w)?,
        }
        Ok(w.into_bytes())
    }

    /// The signing pre-image: SHA-256 of the unsigned bytes.
    pub fn signing_hash(&self) -> Result<[u8; 32], TxError> {
        Ok(sha256(&self.to_bytes()?))
    }

    /// One entry per required credential, in input order; each entry lists
    /// the signer addresses in signature-slot order.
    pub fn credential_addresses(&self) -> Vec<Vec<Address>> {
        match self {
            Self::Base(tx) => Self::input_signers(&tx.inputs),
            Self::CreateAsset(tx) => Self::input_signers(&tx.base.inputs),
            Self::Operation(tx) => {
                let mut all = Self::input_signers(&tx.base.inputs);
                all.extend(tx.ops.iter().map(|op| op.op.signer_addresses()));
                all
            }
            Self::Import(tx) => {
                let mut all = Self::input_signers(&tx.base.inputs);
                all.extend(Self::input_signers(&tx.imported_inputs));
                all
            }
            Self::Export(tx) => Self::input_signers(&tx.base.inputs),
            Self::EvmImport(tx) => Self::input_signers(&tx.imported_inputs),
            Self::EvmExport(tx) => tx.inputs.iter().map(|i| vec![i.address]).collect(),
        }
    }

    fn input_signers(inputs: &[crate::inputs::TransferableInput]) -> Vec<Vec<Address>> {
        inputs.iter().map(|i| i.input.signer_addresses()).collect()
    }

    /// Decode an X/P-dialect transaction. C-chain atomic transactions share
    /// type ids 0 and 1 with the X chain and are decoded by
    /// [`UnsignedTx::from_bytes_evm`] instead.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TxError> {
        let mut r = ByteReader::new(bytes);
        let version = r.get_u16()?;
        if version != CODEC_VERSION {
            return Err(TxError::CodecVersion(version));
        }
        let type_id = r.get_u32()?;
        let tx = match type_id {
            BASE_TX_ID => Self::Base(BaseTx::read_body(&mut r)?),
            CREATE_ASSET_TX_ID => Self::CreateAsset(CreateAssetTx::read_body(&mut r)?),
            OPERATION_TX_ID => Self::Operation(OperationTx::read_body(&mut r)?),
            AVM_IMPORT_TX_ID => Self::Import(ImportTx::read_body(Dialect::Avm, &mut r)?),
            AVM_EXPORT_TX_ID => Self::Export(ExportTx::read_body(Dialect::Avm, &mut r)?),
            PLATFORM_IMPORT_TX_ID => {
                Self::Import(ImportTx::read_body(Dialect::Platform, &mut r)?)
            }
            PLATFORM_EXPORT_TX_ID => {
                Self::Export(ExportTx::read_body(Dialect::Platform, &mut r)?)
            }
            other => return Err(CodecError::UnknownType(other).into()),
        };
        r.finish()?;
        Ok(tx)
    }

    /// Decode a C-chain atomic transaction.
    pub fn from_bytes_evm(bytes: &[u8]) -> Result<Self, TxError> {
        let mut r = ByteReader::new(bytes);
        let version = r.get_u16()?;
        if version != CODEC_VERSION {
            return Err(TxError::CodecVersion(version));
        }
        let type_id = r.get_u32()?;
        let tx = match type_id {
            EVM_IMPORT_TX_ID => Self::EvmImport(EvmImportTx::read_body(&mut r)?),
            EVM_EXPORT_TX_ID => Self::EvmExport(EvmExportTx::read_body(&mut r)?),
            other => return Err(CodecError::UnknownType(other).into()),
        };
        r.finish()?;
        Ok(tx)
    }
}

/// An immutable signed transaction: the unsigned body plus its credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTx {
    pub unsigned: UnsignedTx,
    pub credentials: Vec<Credential>,
}

impl SignedTx {
    /// Assemble a signed transaction. The credential count must match the
    /// transaction's input count.
    pub fn new(unsigned: UnsignedTx, credentials: Vec<Credential>) -> Result<Self, TxError> {
        let expected = unsigned.credential_addresses().len();
        if credentials.len() != expected {
            return Err(TxError::Config(format!(
                "{} credentials supplied, {} inputs require one each",
                credentials.len(),
                expected
            )));
        }
        Ok(Self {
            unsigned,
            credentials,
        })
    }

    /// Serialize: unsigned bytes, then the credential list.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let unsigned = self.unsigned.to_bytes()?;
        let mut w = ByteWriter::with_capacity(unsigned.len() + 128);
        w.put_fixed(&unsigned);
        put_count(&mut w, self.credentials.len())?;
        for cred in &self.credentials {
            cred.write(&mut w)?;
        }
        Ok(w.into_bytes())
    }

    /// The transaction id: SHA-256 of the signed bytes.
    pub fn tx_id(&self) -> Result<TxId, TxError> {
        Ok(TxId::new(sha256(&self.to_bytes()?)))
    }
}
