//! All transaction types of the X, P, and C chain dialects.
//!
//! Transaction kinds:
//! - **BaseTx**: plain value transfer on the X chain
//! - **CreateAssetTx**: mint a new asset family; the transaction id becomes
//!   the asset id
//! - **OperationTx**: state-changing operations on existing assets (minting)
//! - **ImportTx** / **ExportTx**: atomic transfers between chains, in the
//!   X/P dialect (`TransferableOutput` framing) or the C dialect
//!   (`EvmInput` / `EvmOutput` framing)
//!
//! Inputs and outputs are tagged variants selected by a 4-byte type id; the
//! `from_reader` constructors are the decode registry, and unknown ids are
//! surfaced, never guessed.

pub mod base_tx;
pub mod create_asset_tx;
pub mod credential;
pub mod error;
pub mod evm;
pub mod export_tx;
pub mod import_tx;
pub mod inputs;
pub mod operation_tx;
pub mod ops;
pub mod outputs;
pub mod unsigned;

pub use base_tx::BaseTx;
pub use create_asset_tx::{CreateAssetTx, InitialState};
pub use credential::Credential;
pub use error::TxError;
pub use evm::{EvmExportTx, EvmImportTx, EvmInput, EvmOutput};
pub use export_tx::ExportTx;
pub use import_tx::ImportTx;
pub use inputs::{Input, SecpTransferInput, SigIndex, TransferableInput};
pub use operation_tx::OperationTx;
pub use ops::{Operation, SecpMintOperation, TransferableOp};
pub use outputs::{
    NftMintOutput, NftTransferOutput, Output, OutputOwners, SecpMintOutput, SecpTransferOutput,
    StakeableLockOut, TransferableOutput,
};
pub use unsigned::{SignedTx, UnsignedTx};

/// Current serialization codec version, the leading u16 of every transaction.
pub const CODEC_VERSION: u16 = 0;

/// Maximum memo length in bytes.
pub const MAX_MEMO_LEN: usize = 256;

pub(crate) fn put_count(
    w: &mut avax_codec::ByteWriter,
    n: usize,
) -> Result<(), error::TxError> {
    let len = u32::try_from(n).map_err(|_| avax_codec::CodecError::BadLength(n))?;
    w.put_u32(len);
    Ok(())
}

/// Which chain's type-id space an X/P-style transaction body lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// X chain (AVM) type ids.
    Avm,
    /// P chain (PlatformVM) type ids.
    Platform,
}
