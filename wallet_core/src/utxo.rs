//! The UTXO record and the indexed inventory a wallet spends from.

use crate::error::WalletError;
use avax_codec::{cb58_decode, cb58_encode, ByteReader, ByteWriter};
use avax_transactions::{Output, TxError, CODEC_VERSION};
use avax_types::{Address, AssetId, TxId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One unspent output: where it was created, what asset it denominates, and
/// the typed output itself.
///
/// A UTXO is immutable once constructed; its identity is the CB58 encoding
/// of its serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    pub tx_id: TxId,
    pub output_index: u32,
    pub asset_id: AssetId,
    pub output: Output,
}

impl Utxo {
    pub fn new(tx_id: TxId, output_index: u32, asset_id: AssetId, output: Output) -> Self {
        Self {
            tx_id,
            output_index,
            asset_id,
            output,
        }
    }

    /// Wire form: `codecID:u16 ‖ txID ‖ outputIndex ‖ assetID ‖ output`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let mut w = ByteWriter::with_capacity(128);
        w.put_u16(CODEC_VERSION);
        w.put_fixed(self.tx_id.as_bytes());
        w.put_u32(self.output_index);
        w.put_fixed(self.asset_id.as_bytes());
        self.output.write(&mut w)?;
        Ok(w.into_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TxError> {
        let mut r = ByteReader::new(bytes);
        let version = r.get_u16()?;
        if version != CODEC_VERSION {
            return Err(TxError::CodecVersion(version));
        }
        let tx_id = TxId::new(r.get_fixed::<32>()?);
        let output_index = r.get_u32()?;
        let asset_id = AssetId::new(r.get_fixed::<32>()?);
        let output = Output::from_reader(&mut r)?;
        r.finish()?;
        Ok(Self::new(tx_id, output_index, asset_id, output))
    }

    /// The UTXO's identity: CB58 of its serialization.
    pub fn id(&self) -> Result<String, WalletError> {
        Ok(cb58_encode(&self.to_bytes()?))
    }

    pub fn from_cb58(s: &str) -> Result<Self, WalletError> {
        Ok(Self::from_bytes(&cb58_decode(s)?)?)
    }
}

/// An insertion-ordered UTXO inventory with a by-address index.
///
/// The iteration order is the insertion order; coin selection depends on it,
/// so two sets built the same way spend the same way. The address index
/// holds ids only — the set owns each UTXO exactly once.
#[derive(Default)]
pub struct UtxoSet {
    order: Vec<String>,
    by_id: HashMap<String, Utxo>,
    by_address: BTreeMap<Address, BTreeSet<String>>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a UTXO. Returns `false` (and changes nothing) if it is already
    /// present.
    pub fn add(&mut self, utxo: Utxo) -> Result<bool, WalletError> {
        let id = utxo.id()?;
        if self.by_id.contains_key(&id) {
            return Ok(false);
        }
        for addr in utxo.output.addresses() {
            self.by_address
                .entry(*addr)
                .or_default()
                .insert(id.clone());
        }
        self.order.push(id.clone());
        self.by_id.insert(id, utxo);
        Ok(true)
    }

    /// Remove a UTXO by id, cleaning both indices.
    pub fn remove(&mut self, id: &str) -> Option<Utxo> {
        let utxo = self.by_id.remove(id)?;
        self.order.retain(|x| x != id);
        for addr in utxo.output.addresses() {
            if let Some(ids) = self.by_address.get_mut(addr) {
                ids.remove(id);
                if ids.is_empty() {
                    self.by_address.remove(addr);
                }
            }
        }
        Some(utxo)
    }

    pub fn get(&self, id: &str) -> Option<&Utxo> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Utxo> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn all_utxos(&self) -> Vec<&Utxo> {
        self.iter().collect()
    }

    /// UTXOs whose output is owned (in part) by `addr`, in insertion order.
    pub fn utxos_by_address(&self, addr: &Address) -> Vec<&Utxo> {
        let Some(ids) = self.by_address.get(addr) else {
            return Vec::new();
        };
        self.order
            .iter()
            .filter(|id| ids.contains(*id))
            .filter_map(|id| self.by_id.get(id))
            .collect()
    }

    /// Every address reachable from some output, ascending.
    pub fn addresses(&self) -> Vec<Address> {
        self.by_address.keys().copied().collect()
    }

    /// Distinct asset ids present in the set.
    pub fn asset_ids(&self) -> Vec<AssetId> {
        let mut ids: BTreeSet<AssetId> = BTreeSet::new();
        for utxo in self.iter() {
            ids.insert(utxo.asset_id);
        }
        ids.into_iter().collect()
    }

    /// Total of `asset_id` spendable by `addrs` at time `as_of`. Non-amount
    /// outputs and outputs below their threshold do not count.
    pub fn balance(&self, addrs: &[Address], asset_id: AssetId, as_of: u64) -> u64 {
        self.iter()
            .filter(|u| u.asset_id == asset_id)
            .filter(|u| u.output.meets_threshold(addrs, as_of))
            .filter_map(|u| u.output.amount())
            .fold(0u64, u64::saturating_add)
    }

    /// Portable encoding: one CB58 string per UTXO, in set order.
    pub fn to_cb58(&self) -> Result<Vec<String>, WalletError> {
        self.iter().map(|u| u.id()).collect()
    }

    /// Rebuild a set from its portable encoding, preserving order.
    pub fn from_cb58<S: AsRef<str>>(strings: &[S]) -> Result<Self, WalletError> {
        let mut set = Self::new();
        for s in strings {
            set.add(Utxo::from_cb58(s.as_ref())?)?;
        }
        Ok(set)
    }

    /// Absorb a newer snapshot, inserting UTXOs not yet present. Returns how
    /// many were added.
    pub fn merge(&mut self, other: UtxoSet) -> Result<usize, WalletError> {
        let mut added = 0;
        for id in other.order {
            if let Some(utxo) = other.by_id.get(&id) {
                if self.add(utxo.clone())? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avax_transactions::SecpTransferOutput;

    fn addr(fill: u8) -> Address {
        Address::new([fill; 20])
    }

    fn utxo(txid: u8, index: u32, asset: u8, amount: u64, owners: Vec<Address>) -> Utxo {
        Utxo::new(
            TxId::new([txid; 32]),
            index,
            AssetId::new([asset; 32]),
            Output::SecpTransfer(SecpTransferOutput::new(amount, 0, 1, owners).unwrap()),
        )
    }

    #[test]
    fn add_is_idempotent() {
        let mut set = UtxoSet::new();
        let u = utxo(1, 0, 1, 100, vec![addr(1)]);
        assert!(set.add(u.clone()).unwrap());
        assert!(!set.add(u).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut set = UtxoSet::new();
        set.add(utxo(3, 0, 1, 1, vec![addr(1)])).unwrap();
        set.add(utxo(1, 0, 1, 2, vec![addr(1)])).unwrap();
        set.add(utxo(2, 0, 1, 3, vec![addr(1)])).unwrap();
        let amounts: Vec<u64> = set.iter().filter_map(|u| u.output.amount()).collect();
        assert_eq!(amounts, vec![1, 2, 3]);
    }

    #[test]
    fn remove_cleans_both_indices() {
        let mut set = UtxoSet::new();
        let u = utxo(1, 0, 1, 100, vec![addr(1), addr(2)]);
        let id = u.id().unwrap();
        set.add(u).unwrap();
        assert_eq!(set.utxos_by_address(&addr(1)).len(), 1);

        let removed = set.remove(&id).unwrap();
        assert_eq!(removed.output.amount(), Some(100));
        assert!(set.is_empty());
        assert!(set.utxos_by_address(&addr(1)).is_empty());
        assert!(set.addresses().is_empty());
    }

    #[test]
    fn address_index_tracks_every_owner() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, 1, 5, vec![addr(1), addr(2)])).unwrap();
        set.add(utxo(2, 0, 1, 7, vec![addr(2)])).unwrap();
        assert_eq!(set.utxos_by_address(&addr(1)).len(), 1);
        assert_eq!(set.utxos_by_address(&addr(2)).len(), 2);
        assert_eq!(set.addresses(), vec![addr(1), addr(2)]);
    }

    #[test]
    fn balance_respects_asset_owner_and_threshold() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, 1, 100, vec![addr(1)])).unwrap();
        set.add(utxo(2, 0, 1, 50, vec![addr(2)])).unwrap();
        set.add(utxo(3, 0, 2, 999, vec![addr(1)])).unwrap();
        // Locked until 1000.
        set.add(Utxo::new(
            TxId::new([4u8; 32]),
            0,
            AssetId::new([1u8; 32]),
            Output::SecpTransfer(
                SecpTransferOutput::new(31, 1000, 1, vec![addr(1)]).unwrap(),
            ),
        ))
        .unwrap();

        let asset = AssetId::new([1u8; 32]);
        assert_eq!(set.balance(&[addr(1)], asset, 0), 100);
        assert_eq!(set.balance(&[addr(1)], asset, 1000), 131);
        assert_eq!(set.balance(&[addr(1), addr(2)], asset, 0), 150);
        assert_eq!(set.balance(&[addr(2)], AssetId::new([2u8; 32]), 0), 0);
    }

    #[test]
    fn utxo_cb58_roundtrip() {
        let u = utxo(7, 3, 9, 1234, vec![addr(1), addr(5)]);
        let s = u.id().unwrap();
        let decoded = Utxo::from_cb58(&s).unwrap();
        assert_eq!(decoded, u);
    }

    #[test]
    fn set_portable_encoding_roundtrip() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, 1, 10, vec![addr(1)])).unwrap();
        set.add(utxo(2, 1, 2, 20, vec![addr(2)])).unwrap();

        let strings = set.to_cb58().unwrap();
        let rebuilt = UtxoSet::from_cb58(&strings).unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.to_cb58().unwrap(), strings);
    }

    #[test]
    fn merge_adds_only_missing() {
        let mut a = UtxoSet::new();
        a.add(utxo(1, 0, 1, 10, vec![addr(1)])).unwrap();

        let mut b = UtxoSet::new();
        b.add(utxo(1, 0, 1, 10, vec![addr(1)])).unwrap();
        b.add(utxo(2, 0, 1, 20, vec![addr(1)])).unwrap();

        assert_eq!(a.merge(b).unwrap(), 1);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn tampered_utxo_string_rejected() {
        let u = utxo(1, 0, 1, 10, vec![addr(1)]);
        let mut s = u.id().unwrap().into_bytes();
        s[0] = if s[0] == b'2' { b'3' } else { b'2' };
        let s = String::from_utf8(s).unwrap();
        assert!(Utxo::from_cb58(&s).is_err());
    }
}
