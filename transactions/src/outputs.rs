//! Polymorphic transaction outputs.
//!
//! Every output variant is selected on the wire by a 4-byte type id and
//! shares the `OutputOwners` core: a locktime, a signature threshold, and a
//! strictly ascending address list.

use crate::error::TxError;
use crate::inputs::SigIndex;
use avax_codec::{ByteReader, ByteWriter, CodecError};
use avax_types::{address::ADDRESS_LEN, Address, AssetId};

/// Type id of a SECP transfer output (X and P chains).
pub const SECP_TRANSFER_OUTPUT_ID: u32 = 0x0000_0007;
/// Type id of a SECP mint output (X chain).
pub const SECP_MINT_OUTPUT_ID: u32 = 0x0000_0006;
/// Type id of an NFT mint output (X chain).
pub const NFT_MINT_OUTPUT_ID: u32 = 0x0000_000a;
/// Type id of an NFT transfer output (X chain).
pub const NFT_TRANSFER_OUTPUT_ID: u32 = 0x0000_000b;
/// Type id of a stakeable locked output (P chain).
pub const STAKEABLE_LOCK_OUT_ID: u32 = 0x0000_0016;

/// The ownership core shared by every output variant: who may spend it,
/// how many of them must sign, and from when.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOwners {
    locktime: u64,
    threshold: u32,
    addresses: Vec<Address>,
}

impl OutputOwners {
    /// Build an owner set. Addresses are sorted and deduplicated; the
    /// threshold must not exceed the resulting address count.
    pub fn new(locktime: u64, threshold: u32, addresses: Vec<Address>) -> Result<Self, TxError> {
        let addresses = Address::sort_and_dedup(addresses);
        if threshold as usize > addresses.len() {
            return Err(TxError::Config(format!(
                "threshold {} exceeds {} addresses",
                threshold,
                addresses.len()
            )));
        }
        Ok(Self {
            locktime,
            threshold,
            addresses,
        })
    }

    pub fn locktime(&self) -> u64 {
        self.locktime
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Position of `addr` in the canonical address list.
    pub fn address_index(&self, addr: &Address) -> Option<usize> {
        self.addresses.binary_search(addr).ok()
    }

    /// The first `threshold` owned addresses present in `from`, in canonical
    /// order. Empty when the output is still locked at `as_of` or when fewer
    /// than `threshold` addresses qualify.
    pub fn spenders(&self, from: &[Address], as_of: u64) -> Vec<Address> {
        if self.locktime > as_of {
            return Vec::new();
        }
        let qualified: Vec<Address> = self
            .addresses
            .iter()
            .filter(|a| from.contains(a))
            .take(self.threshold as usize)
            .copied()
            .collect();
        if (qualified.len() as u32) < self.threshold {
            return Vec::new();
        }
        qualified
    }

    /// True when the output is unlocked at `as_of` and `from` covers the
    /// signature threshold.
    pub fn meets_threshold(&self, from: &[Address], as_of: u64) -> bool {
        if self.locktime > as_of {
            return false;
        }
        let qualified = self.addresses.iter().filter(|a| from.contains(a)).count();
        qualified as u32 >= self.threshold
    }

    /// Like [`OutputOwners::spenders`], but paired with each spender's
    /// position in the address list, ready to become an input's signature
    /// indices.
    pub fn spender_sig_indices(&self, from: &[Address], as_of: u64) -> Vec<SigIndex> {
        if self.locktime > as_of {
            return Vec::new();
        }
        let qualified: Vec<SigIndex> = self
            .addresses
            .iter()
            .enumerate()
            .filter(|(_, a)| from.contains(a))
            .take(self.threshold as usize)
            .map(|(i, a)| SigIndex {
                index: i as u32,
                address: *a,
            })
            .collect();
        if (qualified.len() as u32) < self.threshold {
            return Vec::new();
        }
        qualified
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u64(self.locktime);
        w.put_u32(self.threshold);
        let len = u32::try_from(self.addresses.len())
            .map_err(|_| CodecError::BadLength(self.addresses.len()))?;
        w.put_u32(len);
        for addr in &self.addresses {
            w.put_fixed(addr.as_bytes());
        }
        Ok(())
    }

    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let locktime = r.get_u64()?;
        let threshold = r.get_u32()?;
        let count = r.get_u32()? as usize;
        let mut addresses = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            addresses.push(Address::new(r.get_fixed::<ADDRESS_LEN>()?));
        }
        Self::new(locktime, threshold, addresses)
    }
}

/// An amount of a fungible asset, spendable by its owner set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecpTransferOutput {
    pub amount: u64,
    pub owners: OutputOwners,
}

impl SecpTransferOutput {
    pub fn new(
        amount: u64,
        locktime: u64,
        threshold: u32,
        addresses: Vec<Address>,
    ) -> Result<Self, TxError> {
        if amount == 0 {
            return Err(TxError::Config("transfer output amount must be > 0".into()));
        }
        Ok(Self {
            amount,
            owners: OutputOwners::new(locktime, threshold, addresses)?,
        })
    }
}

/// The right to mint more of a fungible asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecpMintOutput {
    pub owners: OutputOwners,
}

/// The right to mint NFTs within a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftMintOutput {
    pub group_id: u32,
    pub owners: OutputOwners,
}

/// An NFT: a group id plus an opaque payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftTransferOutput {
    pub group_id: u32,
    pub payload: Vec<u8>,
    pub owners: OutputOwners,
}

/// A P-chain output that stays locked for staking until `locktime`, wrapping
/// an ordinary transfer output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakeableLockOut {
    pub locktime: u64,
    pub inner: Box<Output>,
}

impl StakeableLockOut {
    pub fn new(locktime: u64, inner: Output) -> Result<Self, TxError> {
        if matches!(inner, Output::StakeableLock(_)) {
            return Err(TxError::Config(
                "stakeable lock outputs do not nest".into(),
            ));
        }
        Ok(Self {
            locktime,
            inner: Box::new(inner),
        })
    }
}

/// A transaction output, tagged by its wire type id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    SecpTransfer(SecpTransferOutput),
    SecpMint(SecpMintOutput),
    NftMint(NftMintOutput),
    NftTransfer(NftTransferOutput),
    StakeableLock(StakeableLockOut),
}

impl Output {
    pub fn type_id(&self) -> u32 {
        match self {
            Self::SecpTransfer(_) => SECP_TRANSFER_OUTPUT_ID,
            Self::SecpMint(_) => SECP_MINT_OUTPUT_ID,
            Self::NftMint(_) => NFT_MINT_OUTPUT_ID,
            Self::NftTransfer(_) => NFT_TRANSFER_OUTPUT_ID,
            Self::StakeableLock(_) => STAKEABLE_LOCK_OUT_ID,
        }
    }

    /// The owner set: for locked outputs, the wrapped output's owners.
    pub fn owners(&self) -> &OutputOwners {
        match self {
            Self::SecpTransfer(o) => &o.owners,
            Self::SecpMint(o) => &o.owners,
            Self::NftMint(o) => &o.owners,
            Self::NftTransfer(o) => &o.owners,
            Self::StakeableLock(o) => o.inner.owners(),
        }
    }

    /// The transferable amount, for variants that carry one.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::SecpTransfer(o) => Some(o.amount),
            Self::StakeableLock(o) => o.inner.amount(),
            _ => None,
        }
    }

    /// The time until which this output cannot be spent: the owner locktime,
    /// or for stakeable outputs the later of the stake lock and the owner
    /// locktime.
    pub fn effective_locktime(&self) -> u64 {
        match self {
            Self::StakeableLock(o) => o.locktime.max(o.inner.effective_locktime()),
            other => other.owners().locktime(),
        }
    }

    pub fn addresses(&self) -> &[Address] {
        self.owners().addresses()
    }

    pub fn address_index(&self, addr: &Address) -> Option<usize> {
        self.owners().address_index(addr)
    }

    /// Canonical spender list; see [`OutputOwners::spenders`].
    pub fn spenders(&self, from: &[Address], as_of: u64) -> Vec<Address> {
        if self.effective_locktime() > as_of {
            return Vec::new();
        }
        self.owners().spenders(from, as_of)
    }

    /// True when spendable by `from` at `as_of`; see
    /// [`OutputOwners::meets_threshold`].
    pub fn meets_threshold(&self, from: &[Address], as_of: u64) -> bool {
        if self.effective_locktime() > as_of {
            return false;
        }
        self.owners().meets_threshold(from, as_of)
    }

    /// Spender addresses paired with their signature indices; see
    /// [`OutputOwners::spender_sig_indices`].
    pub fn spender_sig_indices(&self, from: &[Address], as_of: u64) -> Vec<SigIndex> {
        if self.effective_locktime() > as_of {
            return Vec::new();
        }
        self.owners().spender_sig_indices(from, as_of)
    }

    /// Serialize as `type id ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.type_id());
        match self {
            Self::SecpTransfer(o) => {
                w.put_u64(o.amount);
                o.owners.write(w)
            }
            Self::SecpMint(o) => o.owners.write(w),
            Self::NftMint(o) => {
                w.put_u32(o.group_id);
                o.owners.write(w)
            }
            Self::NftTransfer(o) => {
                w.put_u32(o.group_id);
                w.put_var_bytes(&o.payload)?;
                o.owners.write(w)
            }
            Self::StakeableLock(o) => {
                w.put_u64(o.locktime);
                o.inner.write(w)
            }
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let mut w = ByteWriter::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Decode `type id ‖ body`. This is the output registry: an id with no
    /// registered variant is an error, never a guess.
    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let type_id = r.get_u32()?;
        match type_id {
            SECP_TRANSFER_OUTPUT_ID => {
                let amount = r.get_u64()?;
                let owners = OutputOwners::read(r)?;
                if amount == 0 {
                    return Err(TxError::Config("transfer output amount must be > 0".into()));
                }
                Ok(Self::SecpTransfer(SecpTransferOutput { amount, owners }))
            }
            SECP_MINT_OUTPUT_ID => Ok(Self::SecpMint(SecpMintOutput {
                owners: OutputOwners::read(r)?,
            })),
            NFT_MINT_OUTPUT_ID => Ok(Self::NftMint(NftMintOutput {
                group_id: r.get_u32()?,
                owners: OutputOwners::read(r)?,
            })),
            NFT_TRANSFER_OUTPUT_ID => Ok(Self::NftTransfer(NftTransferOutput {
                group_id: r.get_u32()?,
                payload: r.get_var_bytes()?.to_vec(),
                owners: OutputOwners::read(r)?,
            })),
            STAKEABLE_LOCK_OUT_ID => {
                let locktime = r.get_u64()?;
                let inner = Output::from_reader(r)?;
                Ok(Self::StakeableLock(StakeableLockOut::new(locktime, inner)?))
            }
            other => Err(CodecError::UnknownType(other).into()),
        }
    }

    /// Byte-lexicographic comparison of serialized forms, the canonical
    /// output ordering.
    pub fn compare(&self, other: &Self) -> Result<std::cmp::Ordering, TxError> {
        Ok(self.to_bytes()?.cmp(&other.to_bytes()?))
    }
}

/// An output bound to the asset it denominates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferableOutput {
    pub asset_id: AssetId,
    pub output: Output,
}

impl TransferableOutput {
    pub fn new(asset_id: AssetId, output: Output) -> Self {
        Self { asset_id, output }
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_fixed(self.asset_id.as_bytes());
        self.output.write(w)
    }

    pub fn from_reader(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let asset_id = AssetId::new(r.get_fixed::<32>()?);
        let output = Output::from_reader(r)?;
        Ok(Self { asset_id, output })
    }

    /// Sort a list into canonical order: by asset id, then serialized
    /// output bytes.
    pub fn sort_canonical(outs: Vec<Self>) -> Result<Vec<Self>, TxError> {
        let mut keyed = outs
            .into_iter()
            .map(|o| {
                let mut key = o.asset_id.as_bytes().to_vec();
                key.extend_from_slice(&o.output.to_bytes()?);
                Ok((key, o))
            })
            .collect::<Result<Vec<_>, TxError>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(keyed.into_iter().map(|(_, o)| o).collect())
    }
}
