//! Operation transactions: a base body plus a list of asset operations.

use crate::base_tx::BaseTx;
use crate::error::TxError;
use crate::ops::TransferableOp;
use crate::put_count;
use avax_codec::{ByteReader, ByteWriter};

/// Type id of an operation transaction (X chain).
pub const OPERATION_TX_ID: u32 = 0x0000_0002;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationTx {
    pub base: BaseTx,
    /// Operations in canonical (serialized-bytes) order.
    pub ops: Vec<TransferableOp>,
}

impl OperationTx {
    pub fn new(base: BaseTx, ops: Vec<TransferableOp>) -> Result<Self, TxError> {
        Ok(Self {
            base,
            ops: TransferableOp::sort_canonical(ops)?,
        })
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        self.base.write_body(w)?;
        put_count(w, self.ops.len())?;
        for op in &self.ops {
            op.write(w)?;
        }
        Ok(())
    }

    pub fn read_body(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let base = BaseTx::read_body(r)?;
        let count = r.get_u32()? as usize;
        let mut ops = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            ops.push(TransferableOp::from_reader(r)?);
        }
        Self::new(base, ops)
    }
}
