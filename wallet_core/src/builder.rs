//! Transaction builders for the X, P, and C chain dialects.
//!
//! Each builder takes a snapshot of the caller's UTXO inventory (or, for
//! cross-chain imports, an already-fetched atomic UTXO list) and returns an
//! immutable unsigned transaction. Nothing here performs I/O and nothing
//! mutates the caller's sets.

use crate::error::WalletError;
use crate::spend::{get_minimum_spendable, AssetAmountDestination};
use crate::utxo::{Utxo, UtxoSet};
use avax_transactions::{
    BaseTx, CreateAssetTx, Dialect, EvmExportTx, EvmImportTx, EvmInput, EvmOutput, ExportTx,
    ImportTx, InitialState, Input, Operation, OperationTx, Output, SecpMintOperation,
    SecpTransferInput, SecpTransferOutput, TransferableInput, TransferableOp, TransferableOutput,
    UnsignedTx,
};
use avax_types::{Address, AssetId, BlockchainId, NetworkId};
use std::collections::BTreeMap;
use tracing::debug;

/// Builder context for one chain of one network.
pub struct TxBuilder {
    network: NetworkId,
    blockchain_id: BlockchainId,
    avax_asset_id: AssetId,
}

impl TxBuilder {
    pub fn new(network: NetworkId, blockchain_id: BlockchainId, avax_asset_id: AssetId) -> Self {
        Self {
            network,
            blockchain_id,
            avax_asset_id,
        }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn blockchain_id(&self) -> BlockchainId {
        self.blockchain_id
    }

    pub fn avax_asset_id(&self) -> AssetId {
        self.avax_asset_id
    }

    fn check_threshold(threshold: u32, destinations: &[Address]) -> Result<(), WalletError> {
        if threshold as usize > destinations.len() {
            return Err(WalletError::Config(format!(
                "threshold {} exceeds {} destination addresses",
                threshold,
                destinations.len()
            )));
        }
        Ok(())
    }

    fn check_cross_chain_fee_asset(&self, fee: u64, fee_asset: AssetId) -> Result<(), WalletError> {
        if fee > 0 && fee_asset != self.avax_asset_id {
            return Err(WalletError::Config(
                "cross-chain fees must be paid in the AVAX asset".into(),
            ));
        }
        Ok(())
    }

    /// Build a plain value transfer on the X chain.
    ///
    /// Returns `Ok(None)` when `amount` is zero: there is nothing to send
    /// and no transaction is produced.
    #[allow(clippy::too_many_arguments)]
    pub fn build_base_tx(
        &self,
        utxos: &UtxoSet,
        amount: u64,
        asset_id: AssetId,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        fee: u64,
        fee_asset: AssetId,
        memo: Vec<u8>,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<Option<UnsignedTx>, WalletError> {
        Self::check_threshold(threshold, to)?;
        if amount == 0 {
            return Ok(None);
        }

        let mut dest =
            AssetAmountDestination::new(from.to_vec(), to.to_vec(), change.to_vec());
        if asset_id == fee_asset {
            dest.add_asset_amount(asset_id, amount, fee)?;
        } else {
            dest.add_asset_amount(asset_id, amount, 0)?;
            if fee > 0 {
                dest.add_asset_amount(fee_asset, 0, fee)?;
            }
        }

        let spend = get_minimum_spendable(utxos, &mut dest, as_of, locktime, threshold)?;
        let mut outputs = spend.outputs;
        outputs.extend(spend.change_outputs);

        let base = BaseTx::new(
            self.network.id(),
            self.blockchain_id,
            outputs,
            spend.inputs,
            memo,
        )?;
        debug!(amount, asset = %asset_id, "built base tx");
        Ok(Some(UnsignedTx::Base(base)))
    }

    /// Build an asset creation transaction. The accepted transaction's id
    /// becomes the new asset's id.
    #[allow(clippy::too_many_arguments)]
    pub fn build_create_asset_tx(
        &self,
        utxos: &UtxoSet,
        from: &[Address],
        change: &[Address],
        fee: u64,
        fee_asset: AssetId,
        name: String,
        symbol: String,
        denomination: u8,
        initial_states: Vec<InitialState>,
        memo: Vec<u8>,
        as_of: u64,
    ) -> Result<UnsignedTx, WalletError> {
        let (inputs, outputs) = self.fund_fee(utxos, from, change, fee, fee_asset, as_of)?;
        let base = BaseTx::new(
            self.network.id(),
            self.blockchain_id,
            outputs,
            inputs,
            memo,
        )?;
        let tx = CreateAssetTx::new(base, name, symbol, denomination, initial_states)?;
        debug!(name = %tx.name, symbol = %tx.symbol, "built create-asset tx");
        Ok(UnsignedTx::CreateAsset(tx))
    }

    /// Build a mint transaction: spend a mint output, re-issue the mint
    /// authority unchanged, and mint `amount` to `to`.
    #[allow(clippy::too_many_arguments)]
    pub fn build_secp_mint_tx(
        &self,
        utxos: &UtxoSet,
        mint_utxo_id: &str,
        amount: u64,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        fee: u64,
        fee_asset: AssetId,
        memo: Vec<u8>,
        as_of: u64,
    ) -> Result<UnsignedTx, WalletError> {
        let utxo = utxos
            .get(mint_utxo_id)
            .ok_or_else(|| WalletError::Config("mint UTXO not found in set".into()))?;
        let Output::SecpMint(mint_output) = &utxo.output else {
            return Err(WalletError::Config(
                "referenced UTXO is not a mint output".into(),
            ));
        };
        let sig_indices = utxo.output.spender_sig_indices(from, as_of);
        if sig_indices.is_empty() {
            return Err(WalletError::Config(
                "senders cannot satisfy the mint output's threshold".into(),
            ));
        }

        let op = Operation::SecpMint(SecpMintOperation::new(
            sig_indices,
            mint_output.clone(),
            SecpTransferOutput::new(amount, 0, 1, to.to_vec())?,
        )?);
        let transferable_op = TransferableOp::new(
            utxo.asset_id,
            vec![(utxo.tx_id, utxo.output_index)],
            op,
        );

        let (inputs, outputs) = self.fund_fee(utxos, from, change, fee, fee_asset, as_of)?;
        let base = BaseTx::new(
            self.network.id(),
            self.blockchain_id,
            outputs,
            inputs,
            memo,
        )?;
        debug!(amount, asset = %utxo.asset_id, "built mint tx");
        Ok(UnsignedTx::Operation(OperationTx::new(
            base,
            vec![transferable_op],
        )?))
    }

    /// Build an import transaction in the X/P dialect.
    ///
    /// `atomics` is the already-fetched list of UTXOs exported to this chain
    /// from `source_chain`. The fee is paid from the imported value first;
    /// only a remainder is funded from `utxos`.
    #[allow(clippy::too_many_arguments)]
    pub fn build_import_tx(
        &self,
        dialect: Dialect,
        utxos: &UtxoSet,
        atomics: &[Utxo],
        source_chain: BlockchainId,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        fee: u64,
        fee_asset: AssetId,
        memo: Vec<u8>,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<UnsignedTx, WalletError> {
        Self::check_threshold(threshold, to)?;
        self.check_cross_chain_fee_asset(fee, fee_asset)?;

        let (imported_inputs, imported_totals) = self.consume_atomics(atomics, from, as_of)?;

        // The fee comes out of the imported AVAX before anything reaches the
        // destination.
        let avax_imported = imported_totals
            .get(&self.avax_asset_id)
            .copied()
            .unwrap_or(0);
        let fee_from_imports = fee.min(avax_imported);
        let fee_remaining = fee - fee_from_imports;

        let mut outputs = Vec::new();
        for (asset_id, total) in &imported_totals {
            let amount = if *asset_id == self.avax_asset_id {
                total - fee_from_imports
            } else {
                *total
            };
            if amount > 0 {
                outputs.push(TransferableOutput::new(
                    *asset_id,
                    Output::SecpTransfer(SecpTransferOutput::new(
                        amount,
                        locktime,
                        threshold,
                        to.to_vec(),
                    )?),
                ));
            }
        }

        let mut base_inputs = Vec::new();
        if fee_remaining > 0 {
            let mut dest =
                AssetAmountDestination::new(from.to_vec(), to.to_vec(), change.to_vec());
            dest.add_asset_amount(self.avax_asset_id, 0, fee_remaining)?;
            let spend = get_minimum_spendable(utxos, &mut dest, as_of, locktime, threshold)?;
            base_inputs = spend.inputs;
            outputs.extend(spend.outputs);
            outputs.extend(spend.change_outputs);
        }

        let base = BaseTx::new(
            self.network.id(),
            self.blockchain_id,
            outputs,
            base_inputs,
            memo,
        )?;
        debug!(
            imported = imported_inputs.len(),
            fee_from_imports, fee_remaining, "built import tx"
        );
        Ok(UnsignedTx::Import(ImportTx::new(
            dialect,
            base,
            source_chain,
            imported_inputs,
        )))
    }

    /// Build an export transaction in the X/P dialect.
    ///
    /// Returns `Ok(None)` when `amount` is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn build_export_tx(
        &self,
        dialect: Dialect,
        utxos: &UtxoSet,
        amount: u64,
        asset_id: AssetId,
        destination_chain: BlockchainId,
        to: &[Address],
        from: &[Address],
        change: &[Address],
        fee: u64,
        fee_asset: AssetId,
        memo: Vec<u8>,
        as_of: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<Option<UnsignedTx>, WalletError> {
        Self::check_threshold(threshold, to)?;
        self.check_cross_chain_fee_asset(fee, fee_asset)?;
        if amount == 0 {
            return Ok(None);
        }

        let mut dest =
            AssetAmountDestination::new(from.to_vec(), to.to_vec(), change.to_vec());
        if asset_id == fee_asset {
            dest.add_asset_amount(asset_id, amount, fee)?;
        } else {
            dest.add_asset_amount(asset_id, amount, 0)?;
            if fee > 0 {
                dest.add_asset_amount(fee_asset, 0, fee)?;
            }
        }

        let spend = get_minimum_spendable(utxos, &mut dest, as_of, locktime, threshold)?;
        // Destination outputs leave the chain; change stays.
        let base = BaseTx::new(
            self.network.id(),
            self.blockchain_id,
            spend.change_outputs,
            spend.inputs,
            memo,
        )?;
        debug!(amount, asset = %asset_id, "built export tx");
        Ok(Some(UnsignedTx::Export(ExportTx::new(
            dialect,
            base,
            destination_chain,
            spend.outputs,
        )?)))
    }

    /// Build a C-chain import: atomic UTXOs in, EVM account credits out.
    ///
    /// The fee is deducted from the imported AVAX; there is no UTXO set on
    /// this side to cover a shortfall.
    pub fn build_evm_import_tx(
        &self,
        atomics: &[Utxo],
        source_chain: BlockchainId,
        to: Address,
        from: &[Address],
        fee: u64,
        as_of: u64,
    ) -> Result<UnsignedTx, WalletError> {
        let (imported_inputs, imported_totals) = self.consume_atomics(atomics, from, as_of)?;

        let mut outputs = Vec::new();
        for (asset_id, total) in &imported_totals {
            let amount = if *asset_id == self.avax_asset_id {
                if *total < fee {
                    return Err(WalletError::InsufficientFunds {
                        asset_id: *asset_id,
                        needed: fee,
                        available: *total,
                    });
                }
                total - fee
            } else {
                *total
            };
            if amount > 0 {
                outputs.push(EvmOutput::new(to, amount, *asset_id)?);
            }
        }
        if outputs.is_empty() {
            return Err(WalletError::InsufficientFunds {
                asset_id: self.avax_asset_id,
                needed: fee,
                available: avax_total(&imported_totals, self.avax_asset_id),
            });
        }

        debug!(imported = imported_inputs.len(), fee, "built EVM import tx");
        Ok(UnsignedTx::EvmImport(EvmImportTx::new(
            self.network.id(),
            self.blockchain_id,
            source_chain,
            imported_inputs,
            outputs,
        )))
    }

    /// Build a C-chain export: EVM account debits in, exported outputs to
    /// `destination_chain`.
    ///
    /// Returns `Ok(None)` when `amount` is zero. The fee is always an AVAX
    /// debit against the same account and nonce.
    #[allow(clippy::too_many_arguments)]
    pub fn build_evm_export_tx(
        &self,
        amount: u64,
        asset_id: AssetId,
        destination_chain: BlockchainId,
        from: Address,
        nonce: u64,
        to: &[Address],
        fee: u64,
        locktime: u64,
        threshold: u32,
    ) -> Result<Option<UnsignedTx>, WalletError> {
        Self::check_threshold(threshold, to)?;
        if amount == 0 {
            return Ok(None);
        }

        let mut inputs = Vec::new();
        if asset_id == self.avax_asset_id {
            let total = amount
                .checked_add(fee)
                .ok_or_else(|| WalletError::Config("amount plus fee overflows".into()))?;
            inputs.push(EvmInput::new(from, total, self.avax_asset_id, nonce)?);
        } else {
            inputs.push(EvmInput::new(from, amount, asset_id, nonce)?);
            if fee > 0 {
                inputs.push(EvmInput::new(from, fee, self.avax_asset_id, nonce)?);
            }
        }

        let exported = TransferableOutput::new(
            asset_id,
            Output::SecpTransfer(SecpTransferOutput::new(
                amount,
                locktime,
                threshold,
                to.to_vec(),
            )?),
        );

        debug!(amount, asset = %asset_id, "built EVM export tx");
        Ok(Some(UnsignedTx::EvmExport(EvmExportTx::new(
            self.network.id(),
            self.blockchain_id,
            destination_chain,
            inputs,
            vec![exported],
        )?)))
    }

    /// Fund a fee-only demand from the main set: inputs covering `fee` plus
    /// the change they throw off. No fee, no inputs.
    fn fund_fee(
        &self,
        utxos: &UtxoSet,
        from: &[Address],
        change: &[Address],
        fee: u64,
        fee_asset: AssetId,
        as_of: u64,
    ) -> Result<(Vec<TransferableInput>, Vec<TransferableOutput>), WalletError> {
        if fee == 0 {
            return Ok((Vec::new(), Vec::new()));
        }
        let mut dest =
            AssetAmountDestination::new(from.to_vec(), from.to_vec(), change.to_vec());
        dest.add_asset_amount(fee_asset, 0, fee)?;
        let spend = get_minimum_spendable(utxos, &mut dest, as_of, 0, 1)?;
        let mut outputs = spend.outputs;
        outputs.extend(spend.change_outputs);
        Ok((spend.inputs, outputs))
    }

    /// Turn an atomic UTXO list into imported inputs plus per-asset totals.
    fn consume_atomics(
        &self,
        atomics: &[Utxo],
        from: &[Address],
        as_of: u64,
    ) -> Result<(Vec<TransferableInput>, BTreeMap<AssetId, u64>), WalletError> {
        let mut inputs = Vec::new();
        let mut totals: BTreeMap<AssetId, u64> = BTreeMap::new();

        for utxo in atomics {
            let Some(value) = utxo.output.amount() else {
                continue;
            };
            if !utxo.output.meets_threshold(from, as_of) {
                continue;
            }
            let sig_indices = utxo.output.spender_sig_indices(from, as_of);
            let total = totals.entry(utxo.asset_id).or_insert(0);
            *total = total
                .checked_add(value)
                .ok_or_else(|| WalletError::Config("imported amount overflows".into()))?;
            inputs.push(TransferableInput::new(
                utxo.tx_id,
                utxo.output_index,
                utxo.asset_id,
                Input::SecpTransfer(SecpTransferInput::new(value, sig_indices)?),
            ));
        }

        if inputs.is_empty() {
            return Err(WalletError::Config(
                "no spendable atomic UTXOs to import".into(),
            ));
        }
        Ok((inputs, totals))
    }
}

fn avax_total(totals: &BTreeMap<AssetId, u64>, avax: AssetId) -> u64 {
    totals.get(&avax).copied().unwrap_or(0)
}
