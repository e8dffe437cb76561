//! Import transactions (X/P dialect): consume UTXOs exported from another
//! chain's shared atomic memory.

use crate::base_tx::BaseTx;
use crate::error::TxError;
use crate::inputs::TransferableInput;
use crate::{put_count, Dialect};
use avax_codec::{ByteReader, ByteWriter};
use avax_types::BlockchainId;

/// Type id of an import transaction on the X chain.
pub const AVM_IMPORT_TX_ID: u32 = 0x0000_0003;
/// Type id of an import transaction on the P chain.
pub const PLATFORM_IMPORT_TX_ID: u32 = 0x0000_0011;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportTx {
    pub dialect: Dialect,
    pub base: BaseTx,
    /// The chain the imported UTXOs were exported from.
    pub source_chain: BlockchainId,
    /// Inputs spending atomic-memory UTXOs, in canonical order.
    pub imported_inputs: Vec<TransferableInput>,
}

impl ImportTx {
    pub fn new(
        dialect: Dialect,
        base: BaseTx,
        source_chain: BlockchainId,
        imported_inputs: Vec<TransferableInput>,
    ) -> Self {
        Self {
            dialect,
            base,
            source_chain,
            imported_inputs: TransferableInput::sort_canonical(imported_inputs),
        }
    }

    pub fn type_id(&self) -> u32 {
        match self.dialect {
            Dialect::Avm => AVM_IMPORT_TX_ID,
            Dialect::Platform => PLATFORM_IMPORT_TX_ID,
        }
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        self.base.write_body(w)?;
        w.put_fixed(self.source_chain.as_bytes());
        put_count(w, self.imported_inputs.len())?;
        for input in &self.imported_inputs {
            input.write(w)?;
        }
        Ok(())
    }

    pub fn read_body(dialect: Dialect, r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let base = BaseTx::read_body(r)?;
        let source_chain = BlockchainId::new(r.get_fixed::<32>()?);
        let count = r.get_u32()? as usize;
        let mut imported_inputs = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            imported_inputs.push(TransferableInput::from_reader(r)?);
        }
        Ok(Self::new(dialect, base, source_chain, imported_inputs))
    }
}
