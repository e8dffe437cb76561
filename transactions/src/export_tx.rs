//! Export transactions (X/P dialect): move outputs into another chain's
//! shared atomic memory.

use crate::base_tx::BaseTx;
use crate::error::TxError;
use crate::outputs::TransferableOutput;
use crate::{put_count, Dialect};
use avax_codec::{ByteReader, ByteWriter};
use avax_types::BlockchainId;

/// Type id of an export transaction on the X chain.
pub const AVM_EXPORT_TX_ID: u32 = 0x0000_0004;
/// Type id of an export transaction on the P chain.
pub const PLATFORM_EXPORT_TX_ID: u32 = 0x0000_0012;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTx {
    pub dialect: Dialect,
    pub base: BaseTx,
    /// The chain that will import these outputs.
    pub destination_chain: BlockchainId,
    /// Outputs addressed to the destination chain, in canonical order.
    pub exported_outputs: Vec<TransferableOutput>,
}

impl ExportTx {
    pub fn new(
        dialect: Dialect,
        base: BaseTx,
        destination_chain: BlockchainId,
        exported_outputs: Vec<TransferableOutput>,
    ) -> Result<Self, TxError> {
        Ok(Self {
            dialect,
            base,
            destination_chain,
            exported_outputs: TransferableOutput::sort_canonical(exported_outputs)?,
        })
    }

    pub fn type_id(&self) -> u32 {
        match self.dialect {
            Dialect::Avm => AVM_EXPORT_TX_ID,
            Dialect::Platform => PLATFORM_EXPORT_TX_ID,
        }
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        self.base.write_body(w)?;
        w.put_fixed(self.destination_chain.as_bytes());
        put_count(w, self.exported_outputs.len())?;
        for out in &self.exported_outputs {
            out.write(w)?;
        }
        Ok(())
    }

    pub fn read_body(dialect: Dialect, r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let base = BaseTx::read_body(r)?;
        let destination_chain = BlockchainId::new(r.get_fixed::<32>()?);
        let count = r.get_u32()? as usize;
        let mut exported_outputs = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            exported_outputs.push(TransferableOutput::from_reader(r)?);
        }
        Self::new(dialect, base, destination_chain, exported_outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::{Output, SecpTransferOutput};
    use avax_types::{Address, AssetId};

    #[test]
    fn body_byte_roundtrip() {
        let base = BaseTx::new(
            1,
            BlockchainId::new([1u8; 32]),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let exported = TransferableOutput::new(
            AssetId::new([2u8; 32]),
            Output::SecpTransfer(
                SecpTransferOutput::new(250, 0, 1, vec![Address::new([3u8; 20])]).unwrap(),
            ),
        );
        let tx = ExportTx::new(
            Dialect::Avm,
            base,
            BlockchainId::new([9u8; 32]),
            vec![exported],
        )
        .unwrap();
        assert_eq!(tx.type_id(), AVM_EXPORT_TX_ID);

        let mut w = ByteWriter::new();
        tx.write_body(&mut w).unwrap();
        let bytes = w.into_bytes();

        let mut r = ByteReader::new(&bytes);
        let decoded = ExportTx::read_body(Dialect::Avm, &mut r).unwrap();
        r.finish().unwrap();

        let mut again = ByteWriter::new();
        decoded.write_body(&mut again).unwrap();
        assert_eq!(again.into_bytes(), bytes);
    }
}
