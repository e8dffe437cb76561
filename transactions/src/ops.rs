//! Asset operations: state changes on existing assets, carried by an
//! `OperationTx`.

use crate::error::TxError;
use crate::inputs::SigIndex;
use crate::outputs::{OutputOwners, SecpMintOutput, SecpTransferOutput};
use crate::put_count;
use avax_codec::{ByteReader, ByteWriter, CodecError};
use avax_types::{Address, AssetId, TxId};

/// Type id of a SECP mint operation (X chain).
pub const SECP_MINT_OP_ID: u32 = 0x0000_0008;

/// Mints more of a fungible asset: spends a mint output, re-issues the mint
/// authority, and produces the newly minted amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecpMintOperation {
    /// Positions in the spent mint output's address list that will sign.
    pub sig_indices: Vec<SigIndex>,
    /// Replacement mint authority.
    pub mint_output: SecpMintOutput,
    /// The minted amount and its new owners.
    pub transfer_output: SecpTransferOutput,
}

impl SecpMintOperation {
    pub fn new(
        sig_indices: Vec<SigIndex>,
        mint_output: SecpMintOutput,
        transfer_output: SecpTransferOutput,
    ) -> Result<Self, TxError> {
        let strictly_increasing = sig_indices
            .windows(2)
            .all(|pair| pair[0].index < pair[1].index);
        if !strictly_increasing {
            return Err(TxError::Config(
                "signature indices must be strictly increasing".into(),
            ));
        }
        Ok(Self {
            sig_indices,
            mint_output,
            transfer_output,
        })
    }
}

/// An asset operation, tagged by its wire type id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    SecpMint(SecpMintOperation),
}

impl Operation {
    pub fn type_id(&self) -> u32 {
        match self {
            Self::SecpMint(_) => SECP_MINT_OP_ID,
        }
    }

    /// The addresses that must sign this operation, in signature-slot order.
    pub fn signer_addresses(&self) -> Vec<Address> {
        match self {
            Self::SecpMint(op) => op.sig_indices.iter().map(|s| s.address).collect(),
        }
    }

    /// Serialize as `type id ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.type_id());
        match self {
            Self::SecpMint(op) => {
                put_count(w, op.sig_indices.len())?;
                for sig in &op.sig_indices {
                    w.put_u32(sig.index);
                }
                op.mint_output.owners.write(w)?;
                w.put_u64(op.transfer_output.amount);
                op.transfer_output.owners.write(w)
            }
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let mut w = ByteWriter::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Decode `type id ‖ body`; the operation registry.
    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let type_id = r.get_u32()?;
        match type_id {
            SECP_MINT_OP_ID => {
                let count = r.get_u32()? as usize;
                let mut sig_indices = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    sig_indices.push(SigIndex {
                        index: r.get_u32()?,
                        address: Address::ZERO,
                    });
                }
                let mint_output = SecpMintOutput {
                    owners: OutputOwners::read(r)?,
                };
                let amount = r.get_u64()?;
                if amount == 0 {
                    return Err(TxError::Config("minted amount must be > 0".into()));
                }
                let transfer_output = SecpTransferOutput {
                    amount,
                    owners: OutputOwners::read(r)?,
                };
                Ok(Self::SecpMint(SecpMintOperation::new(
                    sig_indices,
                    mint_output,
                    transfer_output,
                )?))
            }
            other => Err(CodecError::UnknownType(other).into()),
        }
    }
}

/// An operation bound to the asset it acts on and the UTXOs it consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferableOp {
    pub asset_id: AssetId,
    /// The spent UTXOs, as `(tx id, output index)` pairs, kept sorted.
    pub utxo_ids: Vec<(TxId, u32)>,
    pub op: Operation,
}

impl TransferableOp {
    pub fn new(asset_id: AssetId, mut utxo_ids: Vec<(TxId, u32)>, op: Operation) -> Self {
        utxo_ids.sort_unstable();
        Self {
            asset_id,
            utxo_ids,
            op,
        }
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_fixed(self.asset_id.as_bytes());
        put_count(w, self.utxo_ids.len())?;
        for (tx_id, index) in &self.utxo_ids {
            w.put_fixed(tx_id.as_bytes());
            w.put_u32(*index);
        }
        self.op.write(w)
    }

    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let asset_id = AssetId::new(r.get_fixed::<32>()?);
        let count = r.get_u32()? as usize;
        let mut utxo_ids = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let tx_id = TxId::new(r.get_fixed::<32>()?);
            let index = r.get_u32()?;
            utxo_ids.push((tx_id, index));
        }
        let op = Operation::from_reader(r)?;
        Ok(Self::new(asset_id, utxo_ids, op))
    }

    /// Sort a list into canonical order by serialized bytes.
    pub fn sort_canonical(ops: Vec<Self>) -> Result<Vec<Self>, TxError> {
        let mut keyed = ops
            .into_iter()
            .map(|op| {
                let mut w = ByteWriter::new();
                op.write(&mut w)?;
                Ok((w.into_bytes(), op))
            })
            .collect::<Result<Vec<_>, TxError>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(keyed.into_iter().map(|(_, op)| op).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(fill: u8) -> Address {
        Address::new([fill; 20])
    }

    fn mint_op() -> Operation {
        Operation::SecpMint(
            SecpMintOperation::new(
                vec![SigIndex {
                    index: 0,
                    address: addr(1),
                }],
                SecpMintOutput {
                    owners: OutputOwners::new(0, 1, vec![addr(1)]).unwrap(),
                },
                SecpTransferOutput::new(5000, 0, 1, vec![addr(2)]).unwrap(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn byte_roundtrip() {
        let op = mint_op();
        let bytes = op.to_bytes().unwrap();
        let mut r = ByteReader::new(&bytes);
        let decoded = Operation::from_reader(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn utxo_ids_sorted_on_construction() {
        let a = (TxId::new([1u8; 32]), 0u32);
        let b = (TxId::new([0u8; 32]), 7u32);
        let op = TransferableOp::new(AssetId::new([5u8; 32]), vec![a, b], mint_op());
        assert_eq!(op.utxo_ids, vec![b, a]);
    }

    #[test]
    fn unknown_op_id_surfaces() {
        let bytes = 0x77u32.to_be_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(
            Operation::from_reader(&mut r),
            Err(TxError::Codec(CodecError::UnknownType(0x77)))
        ));
    }
}
