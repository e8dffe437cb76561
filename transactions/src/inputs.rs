//! Polymorphic transaction inputs.
//!
//! An input spends one output and names, by position, which of the output's
//! addresses will sign. The signer address itself never touches the wire —
//! it rides along as builder metadata so the keychain can resolve keys
//! without re-fetching the spent output.

use crate::error::TxError;
use avax_codec::{ByteReader, ByteWriter, CodecError};
use avax_types::{Address, AssetId, TxId};

/// Type id of a SECP transfer input (X and P chains).
pub const SECP_TRANSFER_INPUT_ID: u32 = 0x0000_0005;

/// One signature slot: a position in the spent output's address list, plus
/// the address at that position.
///
/// Only `index` is serialized. Inputs decoded from bytes carry
/// [`Address::ZERO`] here and cannot be signed without rebuilding against
/// the output they spend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigIndex {
    pub index: u32,
    pub address: Address,
}

/// Spends an amount of a fungible asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecpTransferInput {
    pub amount: u64,
    pub sig_indices: Vec<SigIndex>,
}

impl SecpTransferInput {
    /// Build an input. Signature indices must be strictly increasing and the
    /// amount non-zero.
    pub fn new(amount: u64, sig_indices: Vec<SigIndex>) -> Result<Self, TxError> {
        if amount == 0 {
            return Err(TxError::Config("transfer input amount must be > 0".into()));
        }
        let strictly_increasing = sig_indices
            .windows(2)
            .all(|pair| pair[0].index < pair[1].index);
        if !strictly_increasing {
            return Err(TxError::Config(
                "signature indices must be strictly increasing".into(),
            ));
        }
        Ok(Self {
            amount,
            sig_indices,
        })
    }
}

/// A transaction input, tagged by its wire type id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    SecpTransfer(SecpTransferInput),
}

impl Input {
    pub fn type_id(&self) -> u32 {
        match self {
            Self::SecpTransfer(_) => SECP_TRANSFER_INPUT_ID,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Self::SecpTransfer(i) => i.amount,
        }
    }

    pub fn sig_indices(&self) -> &[SigIndex] {
        match self {
            Self::SecpTransfer(i) => &i.sig_indices,
        }
    }

    /// The addresses that must sign, in signature-slot order.
    pub fn signer_addresses(&self) -> Vec<Address> {
        self.sig_indices().iter().map(|s| s.address).collect()
    }

    /// Serialize as `type id ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.type_id());
        match self {
            Self::SecpTransfer(i) => {
                w.put_u64(i.amount);
                let len = u32::try_from(i.sig_indices.len())
                    .map_err(|_| CodecError::BadLength(i.sig_indices.len()))?;
                w.put_u32(len);
                for sig in &i.sig_indices {
                    w.put_u32(sig.index);
                }
                Ok(())
            }
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let mut w = ByteWriter::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Decode `type id ‖ body`; the input registry.
    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let type_id = r.get_u32()?;
        match type_id {
            SECP_TRANSFER_INPUT_ID => {
                let amount = r.get_u64()?;
                let count = r.get_u32()? as usize;
                let mut sig_indices = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    sig_indices.push(SigIndex {
                        index: r.get_u32()?,
                        address: Address::ZERO,
                    });
                }
                Ok(Self::SecpTransfer(SecpTransferInput::new(
                    amount,
                    sig_indices,
                )?))
            }
            other => Err(CodecError::UnknownType(other).into()),
        }
    }
}

/// An input bound to the UTXO it spends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferableInput {
    pub tx_id: TxId,
    pub output_index: u32,
    pub asset_id: AssetId,
    pub input: Input,
}

impl TransferableInput {
    pub fn new(tx_id: TxId, output_index: u32, asset_id: AssetId, input: Input) -> Self {
        Self {
            tx_id,
            output_index,
            asset_id,
            input,
        }
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_fixed(self.tx_id.as_bytes());
        w.put_u32(self.output_index);
        w.put_fixed(self.asset_id.as_bytes());
        self.input.write(w)
    }

    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let tx_id = TxId::new(r.get_fixed::<32>()?);
        let output_index = r.get_u32()?;
        let asset_id = AssetId::new(r.get_fixed::<32>()?);
        let input = Input::from_reader(r)?;
        Ok(Self {
            tx_id,
            output_index,
            asset_id,
            input,
        })
    }

    /// Sort a list into canonical order: by spent UTXO `(tx id, output index)`.
    pub fn sort_canonical(mut ins: Vec<Self>) -> Vec<Self> {
        ins.sort_by(|a, b| {
            a.tx_id
                .cmp(&b.tx_id)
                .then(a.output_index.cmp(&b.output_index))
        });
        ins
    }
}
