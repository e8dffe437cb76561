//! C-chain atomic transactions.
//!
//! The C chain is account-based: its side of an atomic transfer is an
//! `EvmInput` (debits an account, carries the account nonce) or an
//! `EvmOutput` (credits an account). Neither carries a type-id prefix on the
//! wire; the containing transaction fixes their shape.

use crate::error::TxError;
use crate::inputs::TransferableInput;
use crate::outputs::TransferableOutput;
use crate::put_count;
use avax_codec::{ByteReader, ByteWriter};
use avax_types::{address::ADDRESS_LEN, Address, AssetId, BlockchainId};

/// Type id of an import transaction on the C chain.
pub const EVM_IMPORT_TX_ID: u32 = 0x0000_0000;
/// Type id of an export transaction on the C chain.
pub const EVM_EXPORT_TX_ID: u32 = 0x0000_0001;

/// Credits an EVM account with an amount of an asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvmOutput {
    pub address: Address,
    pub amount: u64,
    pub asset_id: AssetId,
}

impl EvmOutput {
    pub fn new(address: Address, amount: u64, asset_id: AssetId) -> Result<Self, TxError> {
        if amount == 0 {
            return Err(TxError::Config("EVM output amount must be > 0".into()));
        }
        Ok(Self {
            address,
            amount,
            asset_id,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put_fixed(self.address.as_bytes());
        w.put_u64(self.amount);
        w.put_fixed(self.asset_id.as_bytes());
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let address = Address::new(r.get_fixed::<ADDRESS_LEN>()?);
        let amount = r.get_u64()?;
        let asset_id = AssetId::new(r.get_fixed::<32>()?);
        Self::new(address, amount, asset_id)
    }
}

/// Debits an EVM account; `nonce` must match the account's next nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvmInput {
    pub address: Address,
    pub amount: u64,
    pub asset_id: AssetId,
    pub nonce: u64,
}

impl EvmInput {
    pub fn new(
        address: Address,
        amount: u64,
        asset_id: AssetId,
        nonce: u64,
    ) -> Result<Self, TxError> {
        if amount == 0 {
            return Err(TxError::Config("EVM input amount must be > 0".into()));
        }
        Ok(Self {
            address,
            amount,
            asset_id,
            nonce,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put_fixed(self.address.as_bytes());
        w.put_u64(self.amount);
        w.put_fixed(self.asset_id.as_bytes());
        w.put_u64(self.nonce);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let address = Address::new(r.get_fixed::<ADDRESS_LEN>()?);
        let amount = r.get_u64()?;
        let asset_id = AssetId::new(r.get_fixed::<32>()?);
        let nonce = r.get_u64()?;
        Self::new(address, amount, asset_id, nonce)
    }
}

/// Imports atomic-memory UTXOs from another chain into EVM accounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmImportTx {
    pub network_id: u32,
    pub blockchain_id: BlockchainId,
    pub source_chain: BlockchainId,
    pub imported_inputs: Vec<TransferableInput>,
    /// Account credits, sorted by `(address, asset id)`.
    pub outputs: Vec<EvmOutput>,
}

impl EvmImportTx {
    pub fn new(
        network_id: u32,
        blockchain_id: BlockchainId,
        source_chain: BlockchainId,
        imported_inputs: Vec<TransferableInput>,
        mut outputs: Vec<EvmOutput>,
    ) -> Self {
        outputs.sort_by(|a, b| {
            a.address
                .cmp(&b.address)
                .then(a.asset_id.cmp(&b.asset_id))
        });
        Self {
            network_id,
            blockchain_id,
            source_chain,
            imported_inputs: TransferableInput::sort_canonical(imported_inputs),
            outputs,
        }
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.network_id);
        w.put_fixed(self.blockchain_id.as_bytes());
        w.put_fixed(self.source_chain.as_bytes());
        put_count(w, self.imported_inputs.len())?;
        for input in &self.imported_inputs {
            input.write(w)?;
        }
        put_count(w, self.outputs.len())?;
        for out in &self.outputs {
            out.write(w);
        }
        Ok(())
    }

    pub fn read_body(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let network_id = r.get_u32()?;
        let blockchain_id = BlockchainId::new(r.get_fixed::<32>()?);
        let source_chain = BlockchainId::new(r.get_fixed::<32>()?);
        let in_count = r.get_u32()? as usize;
        let mut imported_inputs = Vec::with_capacity(in_count.min(1024));
        for _ in 0..in_count {
            imported_inputs.push(TransferableInput::from_reader(r)?);
        }
        let out_count = r.get_u32()? as usize;
        let mut outputs = Vec::with_capacity(out_count.min(1024));
        for _ in 0..out_count {
            outputs.push(EvmOutput::read(r)?);
        }
        Ok(Self::new(
            network_id,
            blockchain_id,
            source_chain,
            imported_inputs,
            outputs,
        ))
    }
}

/// Exports value from EVM accounts into another chain's atomic memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmExportTx {
    pub network_id: u32,
    pub blockchain_id: BlockchainId,
    pub destination_chain: BlockchainId,
    /// Account debits, sorted by `(address, asset id)`.
    pub inputs: Vec<EvmInput>,
    pub exported_outputs: Vec<TransferableOutput>,
}

impl EvmExportTx {
    pub fn new(
        network_id: u32,
        blockchain_id: BlockchainId,
        destination_chain: BlockchainId,
        mut inputs: Vec<EvmInput>,
        exported_outputs: Vec<TransferableOutput>,
    ) -> Result<Self, TxError> {
        inputs.sort_by(|a, b| {
            a.address
                .cmp(&b.address)
                .then(a.asset_id.cmp(&b.asset_id))
        });
        Ok(Self {
            network_id,
            blockchain_id,
            destination_chain,
            inputs,
            exported_outputs: TransferableOutput::sort_canonical(exported_outputs)?,
        })
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.network_id);
        w.put_fixed(self.blockchain_id.as_bytes());
        w.put_fixed(self.destination_chain.as_bytes());
        put_count(w, self.inputs.len())?;
        for input in &self.inputs {
            input.write(w);
        }
        put_count(w, self.exported_outputs.len())?;
        for out in &self.exported_outputs {
            out.write(w)?;
        }
        Ok(())
    }

    pub fn read_body(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let network_id = r.get_u32()?;
        let blockchain_id = BlockchainId::new(r.get_fixed::<32>()?);
        let destination_chain = BlockchainId::new(r.get_fixed::<32>()?);
        let in_count = r.get_u32()? as usize;
        let mut inputs = Vec::with_capacity(in_count.min(1024));
        for _ in 0..in_count {
            inputs.push(EvmInput::read(r)?);
        }
        let out_count = r.get_u32()? as usize;
        let mut exported_outputs = Vec::with_capacity(out_count.min(1024));
        for _ in 0..out_count {
            exported_outputs.push(TransferableOutput::from_reader(r)?);
        }
        Self::new(
            network_id,
            blockchain_id,
            destination_chain,
            inputs,
            exported_outputs,
        )
    }
}
