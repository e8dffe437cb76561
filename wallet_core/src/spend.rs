//! Deterministic multi-asset coin selection.
//!
//! The solver walks the UTXO set in its iteration order and greedily
//! consumes the first spendable outputs it finds, per asset, until every
//! demand is covered. Greedy first-fit keeps construction reproducible:
//! the same set and the same demand always produce the same transaction.

use crate::error::WalletError;
use crate::utxo::UtxoSet;
use avax_transactions::{
    Input, Output, SecpTransferInput, SecpTransferOutput, TransferableInput, TransferableOutput,
};
use avax_types::{Address, AssetId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Demand state for one asset: how much must reach the destination, how much
/// is burned (fees), and how far selection has progressed.
#[derive(Clone, Debug)]
pub struct AssetAmount {
    asset_id: AssetId,
    amount: u64,
    burn: u64,
    spent: u64,
    change: u64,
    finished: bool,
}

impl AssetAmount {
    fn new(asset_id: AssetId, amount: u64, burn: u64) -> Self {
        Self {
            asset_id,
            amount,
            burn,
            spent: 0,
            change: 0,
            // A demand for nothing is born satisfied.
            finished: amount == 0 && burn == 0,
        }
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn burn(&self) -> u64 {
        self.burn
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn change(&self) -> u64 {
        self.change
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// The total this demand must consume before it is satisfied.
    fn needed(&self) -> Result<u64, WalletError> {
        self.amount
            .checked_add(self.burn)
            .ok_or_else(|| WalletError::Config("demand amount overflow".into()))
    }

    /// Consume one output's full value.
    fn consume(&mut self, value: u64) -> Result<(), WalletError> {
        self.spent = self
            .spent
            .checked_add(value)
            .ok_or_else(|| WalletError::Config("spent amount overflow".into()))?;
        let needed = self.needed()?;
        if self.spent >= needed {
            self.finished = true;
            self.change = self.spent - needed;
        }
        Ok(())
    }
}

/// A full multi-asset demand: who spends, who receives, where change goes,
/// and per-asset amounts.
pub struct AssetAmountDestination {
    senders: Vec<Address>,
    destinations: Vec<Address>,
    change_addresses: Vec<Address>,
    amounts: Vec<AssetAmount>,
    index: HashMap<AssetId, usize>,
}

impl AssetAmountDestination {
    pub fn new(
        senders: Vec<Address>,
        destinations: Vec<Address>,
        change_addresses: Vec<Address>,
    ) -> Self {
        Self {
            senders,
            destinations,
            change_addresses,
            amounts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a demand. Demands for the same asset merge by addition.
    pub fn add_asset_amount(
        &mut self,
        asset_id: AssetId,
        amount: u64,
        burn: u64,
    ) -> Result<(), WalletError> {
        if let Some(&i) = self.index.get(&asset_id) {
            let existing = &mut self.amounts[i];
            let amount = existing
                .amount
                .checked_add(amount)
                .ok_or_else(|| WalletError::Config("demand amount overflow".into()))?;
            let burn = existing
                .burn
                .checked_add(burn)
                .ok_or_else(|| WalletError::Config("demand burn overflow".into()))?;
            *existing = AssetAmount::new(asset_id, amount, burn);
        } else {
            self.index.insert(asset_id, self.amounts.len());
            self.amounts.push(AssetAmount::new(asset_id, amount, burn));
        }
        Ok(())
    }

    pub fn senders(&self) -> &[Address] {
        &self.senders
    }

    pub fn destinations(&self) -> &[Address] {
        &self.destinations
    }

    pub fn change_addresses(&self) -> &[Address] {
        &self.change_addresses
    }

    pub fn amounts(&self) -> &[AssetAmount] {
        &self.amounts
    }

    fn get_mut(&mut self, asset_id: &AssetId) -> Option<&mut AssetAmount> {
        self.index.get(asset_id).map(|&i| &mut self.amounts[i])
    }

    fn is_satisfied(&self) -> bool {
        self.amounts.iter().all(AssetAmount::finished)
    }

    fn first_unfinished(&self) -> Option<&AssetAmount> {
        self.amounts.iter().find(|a| !a.finished)
    }
}

/// What the solver produced: balanced inputs, destination outputs, and
/// change outputs.
#[derive(Debug)]
pub struct SpendResult {
    pub inputs: Vec<TransferableInput>,
    pub outputs: Vec<TransferableOutput>,
    pub change_outputs: Vec<TransferableOutput>,
}

/// Select UTXOs covering every demand in `dest` and emit balanced inputs and
/// outputs.
///
/// Selection skips, without error: assets nobody demanded, non-amount
/// output variants (mint outputs, NFTs), and outputs the senders cannot
/// unlock at `as_of`. Exhausting the set with a demand still open is
/// [`WalletError::InsufficientFunds`].
///
/// Destination outputs carry `locktime` and `threshold`; change outputs are
/// always immediately spendable by the change addresses alone.
pub fn get_minimum_spendable(
    set: &UtxoSet,
    dest: &mut AssetAmountDestination,
    as_of: u64,
    locktime: u64,
    threshold: u32,
) -> Result<SpendResult, WalletError> {
    let mut inputs = Vec::new();
    let senders = dest.senders().to_vec();

    for utxo in set.iter() {
        if dest.is_satisfied() {
            break;
        }
        let Some(demand) = dest.get_mut(&utxo.asset_id) else {
            continue;
        };
        if demand.finished() {
            continue;
        }
        let Some(value) = utxo.output.amount() else {
            trace!(asset = %utxo.asset_id, "skipping non-amount output");
            continue;
        };
        if !utxo.output.meets_threshold(&senders, as_of) {
            continue;
        }

        let sig_indices = utxo.output.spender_sig_indices(&senders, as_of);
        demand.consume(value)?;
        trace!(
            tx_id = %utxo.tx_id,
            output_index = utxo.output_index,
            asset = %utxo.asset_id,
            value,
            "selected utxo"
        );
        inputs.push(TransferableInput::new(
            utxo.tx_id,
            utxo.output_index,
            utxo.asset_id,
            Input::SecpTransfer(SecpTransferInput::new(value, sig_indices)?),
        ));
    }

    if let Some(unmet) = dest.first_unfinished() {
        return Err(WalletError::InsufficientFunds {
            asset_id: unmet.asset_id,
            needed: unmet.needed()?,
            available: unmet.spent,
        });
    }

    let mut outputs = Vec::new();
    let mut change_outputs = Vec::new();
    for demand in dest.amounts() {
        if demand.amount() > 0 {
            outputs.push(TransferableOutput::new(
                demand.asset_id(),
                Output::SecpTransfer(SecpTransferOutput::new(
                    demand.amount(),
                    locktime,
                    threshold,
                    dest.destinations().to_vec(),
                )?),
            ));
        }
        if demand.change() > 0 {
            change_outputs.push(TransferableOutput::new(
                demand.asset_id(),
                Output::SecpTransfer(SecpTransferOutput::new(
                    demand.change(),
                    0,
                    1,
                    dest.change_addresses().to_vec(),
                )?),
            ));
        }
    }

    debug!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        change = change_outputs.len(),
        "spend solved"
    );
    Ok(SpendResult {
        inputs,
        outputs,
        change_outputs,
    })
}
