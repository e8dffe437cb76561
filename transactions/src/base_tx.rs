//! The base transaction body: a plain value transfer.
//!
//! Every X/P-dialect transaction embeds this body. Wire layout (after the
//! codec version and type id):
//! `networkID:u32 ‖ blockchainID:[32] ‖ outs ‖ ins ‖ memo`.

use crate::error::TxError;
use crate::inputs::TransferableInput;
use crate::outputs::TransferableOutput;
use crate::{put_count, MAX_MEMO_LEN};
use avax_codec::{ByteReader, ByteWriter};
use avax_types::BlockchainId;

/// Type id of a base transaction (X chain).
pub const BASE_TX_ID: u32 = 0x0000_0000;

/// A value transfer: inputs consumed, outputs created, an optional memo.
///
/// Outputs and inputs are held in canonical order: outputs by
/// `(asset id, serialized bytes)`, inputs by `(tx id, output index)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseTx {
    pub network_id: u32,
    pub blockchain_id: BlockchainId,
    pub outputs: Vec<TransferableOutput>,
    pub inputs: Vec<TransferableInput>,
    pub memo: Vec<u8>,
}

impl BaseTx {
    pub fn new(
        network_id: u32,
        blockchain_id: BlockchainId,
        outputs: Vec<TransferableOutput>,
        inputs: Vec<TransferableInput>,
        memo: Vec<u8>,
    ) -> Result<Self, TxError> {
        if memo.len() > MAX_MEMO_LEN {
            return Err(TxError::Config(format!(
                "memo is {} bytes, limit is {MAX_MEMO_LEN}",
                memo.len()
            )));
        }
        Ok(Self {
            network_id,
            blockchain_id,
            outputs: TransferableOutput::sort_canonical(outputs)?,
            inputs: TransferableInput::sort_canonical(inputs),
            memo,
        })
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.network_id);
        w.put_fixed(self.blockchain_id.as_bytes());
        put_count(w, self.outputs.len())?;
        for out in &self.outputs {
            out.write(w)?;
        }
        put_count(w, self.inputs.len())?;
        for input in &self.inputs {
            input.write(w)?;
        }
        w.put_var_bytes(&self.memo)?;
        Ok(())
    }

    pub fn read_body(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let network_id = r.get_u32()?;
        let blockchain_id = BlockchainId::new(r.get_fixed::<32>()?);
        let out_count = r.get_u32()? as usize;
        let mut outputs = Vec::with_capacity(out_count.min(1024));
        for _ in 0..out_count {
            outputs.push(TransferableOutput::from_reader(r)?);
        }
        let in_count = r.get_u32()? as usize;
        let mut inputs = Vec::with_capacity(in_count.min(1024));
        for _ in 0..in_count {
            inputs.push(TransferableInput::from_reader(r)?);
        }
        let memo = r.get_var_bytes()?.to_vec();
        Self::new(network_id, blockchain_id, outputs, inputs, memo)
    }
}
