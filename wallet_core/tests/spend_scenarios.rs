//! End-to-end construction scenarios: intent in, canonical signed bytes out.

use std::collections::BTreeMap;

use avax_transactions::{
    create_asset_tx::SECP_FX_ID, Dialect, InitialState, Output, OutputOwners, SecpMintOutput,
    SecpTransferOutput, UnsignedTx,
};
use avax_types::{Address, AssetId, BlockchainId, ChainAlias, NetworkId, TxId};
use avax_wallet_core::{KeyChain, TxBuilder, Utxo, UtxoSet, WalletError};

fn addr(fill: u8) -> Address {
    Address::new([fill; 20])
}

fn asset(fill: u8) -> AssetId {
    AssetId::new([fill; 32])
}

fn avax() -> AssetId {
    asset(0xAA)
}

fn builder() -> TxBuilder {
    TxBuilder::new(NetworkId::Local, BlockchainId::new([0x10; 32]), avax())
}

fn transfer_utxo(
    txid: u8,
    index: u32,
    asset_id: AssetId,
    amount: u64,
    threshold: u32,
    owners: Vec<Address>,
) -> Utxo {
    Utxo::new(
        TxId::new([txid; 32]),
        index,
        asset_id,
        Output::SecpTransfer(SecpTransferOutput::new(amount, 0, threshold, owners).unwrap()),
    )
}

/// Per-asset sums of a built base transaction body.
fn sums(tx: &UnsignedTx) -> (BTreeMap<AssetId, u64>, BTreeMap<AssetId, u64>) {
    let UnsignedTx::Base(base) = tx else {
        panic!("expected a base tx");
    };
    let mut ins = BTreeMap::new();
    for input in &base.inputs {
        *ins.entry(input.asset_id).or_insert(0u64) += input.input.amount();
    }
    let mut outs = BTreeMap::new();
    for out in &base.outputs {
        *outs.entry(out.asset_id).or_insert(0u64) += out.output.amount().unwrap_or(0);
    }
    (ins, outs)
}

#[test]
fn single_asset_send_with_change() {
    let a = asset(1);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 1000, 1, vec![addr(1)])).unwrap();

    let tx = builder()
        .build_base_tx(
            &set,
            300,
            a,
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            10,
            a,
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap()
        .expect("non-zero amount builds a tx");

    let UnsignedTx::Base(base) = &tx else {
        panic!("expected a base tx")
    };
    assert_eq!(base.inputs.len(), 1);
    let indices: Vec<u32> = base.inputs[0]
        .input
        .sig_indices()
        .iter()
        .map(|s| s.index)
        .collect();
    assert_eq!(indices, vec![0]);

    assert_eq!(base.outputs.len(), 2);
    let amounts: Vec<u64> = base
        .outputs
        .iter()
        .filter_map(|o| o.output.amount())
        .collect();
    assert!(amounts.contains(&300));
    assert!(amounts.contains(&690));

    // Outputs are in canonical serialized-bytes order.
    let keys: Vec<Vec<u8>> = base
        .outputs
        .iter()
        .map(|o| {
            let mut k = o.asset_id.as_bytes().to_vec();
            k.extend_from_slice(&o.output.to_bytes().unwrap());
            k
        })
        .collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));

    // Conservation: inputs = outputs + fee.
    let (ins, outs) = sums(&tx);
    assert_eq!(ins[&a], outs[&a] + 10);
}

#[test]
fn two_asset_send_with_separate_fee_asset() {
    let a = asset(1);
    let x = asset(2);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 500, 1, vec![addr(1)])).unwrap();
    set.add(transfer_utxo(2, 0, x, 50, 1, vec![addr(1)])).unwrap();

    let tx = builder()
        .build_base_tx(
            &set,
            200,
            a,
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            10,
            x,
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap()
        .unwrap();

    let UnsignedTx::Base(base) = &tx else {
        panic!("expected a base tx")
    };
    assert_eq!(base.inputs.len(), 2);
    assert_eq!(base.outputs.len(), 3);

    let (ins, outs) = sums(&tx);
    assert_eq!(ins[&a], 500);
    assert_eq!(outs[&a], 200 + 300);
    assert_eq!(ins[&x], 50);
    assert_eq!(outs[&x], 40);
}

#[test]
fn insufficient_funds_produces_no_transaction() {
    let a = asset(1);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 60, 1, vec![addr(1)])).unwrap();
    set.add(transfer_utxo(2, 0, a, 40, 1, vec![addr(1)])).unwrap();

    let err = builder()
        .build_base_tx(
            &set,
            200,
            a,
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            0,
            a,
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap_err();

    assert_eq!(
        err,
        WalletError::InsufficientFunds {
            asset_id: a,
            needed: 200,
            available: 100,
        }
    );
}

#[test]
fn multisig_threshold_selects_owner_positions() {
    let a = asset(1);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(
        1,
        0,
        a,
        500,
        2,
        vec![addr(1), addr(2), addr(3)],
    ))
    .unwrap();

    let tx = builder()
        .build_base_tx(
            &set,
            500,
            a,
            &[addr(5)],
            &[addr(1), addr(3)],
            &[addr(1)],
            0,
            a,
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap()
        .unwrap();

    let UnsignedTx::Base(base) = &tx else {
        panic!("expected a base tx")
    };
    let indices: Vec<u32> = base.inputs[0]
        .input
        .sig_indices()
        .iter()
        .map(|s| s.index)
        .collect();
    assert_eq!(indices, vec![0, 2]);
    // Every input covers the spent output's threshold.
    assert!(indices.len() >= 2);
}

#[test]
fn building_twice_is_byte_identical() {
    let a = asset(1);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 1000, 1, vec![addr(1)])).unwrap();
    set.add(transfer_utxo(2, 0, a, 400, 1, vec![addr(1)])).unwrap();

    let build = || {
        builder()
            .build_base_tx(
                &set,
                1200,
                a,
                &[addr(2)],
                &[addr(1)],
                &[addr(1)],
                0,
                a,
                b"memo".to_vec(),
                0,
                0,
                1,
            )
            .unwrap()
            .unwrap()
            .to_bytes()
            .unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn zero_amount_is_a_noop() {
    let set = UtxoSet::new();
    let result = builder()
        .build_base_tx(
            &set,
            0,
            asset(1),
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            0,
            asset(1),
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn threshold_exceeding_destinations_rejected() {
    let set = UtxoSet::new();
    let err = builder()
        .build_base_tx(
            &set,
            10,
            asset(1),
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            0,
            asset(1),
            Vec::new(),
            0,
            0,
            2,
        )
        .unwrap_err();
    assert!(matches!(err, WalletError::Config(_)));
}

#[test]
fn oversized_memo_rejected() {
    let a = asset(1);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 100, 1, vec![addr(1)])).unwrap();

    let err = builder()
        .build_base_tx(
            &set,
            50,
            a,
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            0,
            a,
            vec![0u8; 257],
            0,
            0,
            1,
        )
        .unwrap_err();
    assert!(matches!(err, WalletError::Tx(_)));
}

#[test]
fn evm_import_pays_fee_from_imported_value() {
    let atomic = transfer_utxo(1, 0, avax(), 100, 1, vec![addr(1)]);
    let evm_addr = addr(0xEE);

    let tx = builder()
        .build_evm_import_tx(
            &[atomic],
            BlockchainId::new([0x20; 32]),
            evm_addr,
            &[addr(1)],
            10,
            0,
        )
        .unwrap();

    let UnsignedTx::EvmImport(import) = &tx else {
        panic!("expected an EVM import tx")
    };
    assert_eq!(import.imported_inputs.len(), 1);
    assert_eq!(import.imported_inputs[0].input.amount(), 100);
    assert_eq!(import.outputs.len(), 1);
    assert_eq!(import.outputs[0].address, evm_addr);
    assert_eq!(import.outputs[0].amount, 90);
    assert_eq!(import.outputs[0].asset_id, avax());
}

#[test]
fn evm_import_smaller_than_fee_fails() {
    let atomic = transfer_utxo(1, 0, avax(), 5, 1, vec![addr(1)]);
    let err = builder()
        .build_evm_import_tx(
            &[atomic],
            BlockchainId::new([0x20; 32]),
            addr(0xEE),
            &[addr(1)],
            10,
            0,
        )
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
}

#[test]
fn import_fee_remainder_comes_from_main_set() {
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(9, 0, avax(), 50, 1, vec![addr(1)])).unwrap();
    let atomic = transfer_utxo(1, 0, avax(), 4, 1, vec![addr(1)]);

    let tx = builder()
        .build_import_tx(
            Dialect::Avm,
            &set,
            &[atomic],
            BlockchainId::new([0x20; 32]),
            &[addr(1)],
            &[addr(1)],
            &[addr(1)],
            10,
            avax(),
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap();

    let UnsignedTx::Import(import) = &tx else {
        panic!("expected an import tx")
    };
    // The 4 imported AVAX all went to the fee; 6 more came from the set.
    assert_eq!(import.imported_inputs.len(), 1);
    assert_eq!(import.base.inputs.len(), 1);
    assert_eq!(import.base.inputs[0].input.amount(), 50);
    let change: Vec<u64> = import
        .base
        .outputs
        .iter()
        .filter_map(|o| o.output.amount())
        .collect();
    assert_eq!(change, vec![44]);
}

#[test]
fn import_with_non_avax_fee_asset_rejected() {
    let atomic = transfer_utxo(1, 0, avax(), 100, 1, vec![addr(1)]);
    let err = builder()
        .build_import_tx(
            Dialect::Avm,
            &UtxoSet::new(),
            &[atomic],
            BlockchainId::new([0x20; 32]),
            &[addr(1)],
            &[addr(1)],
            &[addr(1)],
            10,
            asset(7),
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap_err();
    assert!(matches!(err, WalletError::Config(_)));
}

#[test]
fn export_keeps_change_on_source_chain() {
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, avax(), 500, 1, vec![addr(1)])).unwrap();

    let tx = builder()
        .build_export_tx(
            Dialect::Avm,
            &set,
            200,
            avax(),
            BlockchainId::new([0x30; 32]),
            &[addr(2)],
            &[addr(1)],
            &[addr(1)],
            10,
            avax(),
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap()
        .unwrap();

    let UnsignedTx::Export(export) = &tx else {
        panic!("expected an export tx")
    };
    assert_eq!(export.exported_outputs.len(), 1);
    assert_eq!(export.exported_outputs[0].output.amount(), Some(200));
    assert_eq!(export.base.outputs.len(), 1);
    assert_eq!(export.base.outputs[0].output.amount(), Some(290));
}

#[test]
fn evm_export_debits_account_with_nonce() {
    let tx = builder()
        .build_evm_export_tx(
            70,
            avax(),
            BlockchainId::new([0x30; 32]),
            addr(0xEE),
            5,
            &[addr(2)],
            1,
            0,
            1,
        )
        .unwrap()
        .unwrap();

    let UnsignedTx::EvmExport(export) = &tx else {
        panic!("expected an EVM export tx")
    };
    assert_eq!(export.inputs.len(), 1);
    assert_eq!(export.inputs[0].amount, 71);
    assert_eq!(export.inputs[0].nonce, 5);
    assert_eq!(export.exported_outputs[0].output.amount(), Some(70));
}

#[test]
fn create_asset_tx_funds_fee_and_carries_genesis() {
    let owner = addr(1);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, avax(), 100, 1, vec![owner])).unwrap();

    let genesis = InitialState::new(
        SECP_FX_ID,
        vec![
            Output::SecpTransfer(SecpTransferOutput::new(1_000_000, 0, 1, vec![owner]).unwrap()),
            Output::SecpMint(SecpMintOutput {
                owners: OutputOwners::new(0, 1, vec![owner]).unwrap(),
            }),
        ],
    )
    .unwrap();

    let tx = builder()
        .build_create_asset_tx(
            &set,
            &[owner],
            &[owner],
            10,
            avax(),
            "Test Token".into(),
            "TST".into(),
            9,
            vec![genesis],
            Vec::new(),
            0,
        )
        .unwrap();

    let UnsignedTx::CreateAsset(create) = &tx else {
        panic!("expected a create-asset tx")
    };
    assert_eq!(create.base.inputs.len(), 1);
    // Fee change only.
    assert_eq!(create.base.outputs.len(), 1);
    assert_eq!(create.base.outputs[0].output.amount(), Some(90));
    assert_eq!(create.initial_states.len(), 1);

    // The body decodes through the X-chain registry.
    let bytes = tx.to_bytes().unwrap();
    let decoded = UnsignedTx::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn mint_tx_spends_the_mint_output_and_pays_fee() {
    let owner = addr(1);
    let a = asset(3);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, avax(), 50, 1, vec![owner])).unwrap();

    let mint_utxo = Utxo::new(
        TxId::new([2u8; 32]),
        1,
        a,
        Output::SecpMint(SecpMintOutput {
            owners: OutputOwners::new(0, 1, vec![owner]).unwrap(),
        }),
    );
    let mint_id = mint_utxo.id().unwrap();
    set.add(mint_utxo).unwrap();

    let tx = builder()
        .build_secp_mint_tx(
            &set,
            &mint_id,
            7777,
            &[addr(2)],
            &[owner],
            &[owner],
            5,
            avax(),
            Vec::new(),
            0,
        )
        .unwrap();

    let UnsignedTx::Operation(op_tx) = &tx else {
        panic!("expected an operation tx")
    };
    assert_eq!(op_tx.ops.len(), 1);
    assert_eq!(op_tx.ops[0].asset_id, a);
    assert_eq!(op_tx.ops[0].utxo_ids, vec![(TxId::new([2u8; 32]), 1)]);
    assert_eq!(op_tx.base.inputs.len(), 1);
    assert_eq!(op_tx.base.outputs[0].output.amount(), Some(45));

    // One credential for the fee input, one for the mint operation.
    assert_eq!(tx.credential_addresses().len(), 2);
}

#[test]
fn minting_against_a_transfer_output_is_rejected() {
    let owner = addr(1);
    let mut set = UtxoSet::new();
    let plain = transfer_utxo(1, 0, asset(3), 10, 1, vec![owner]);
    let plain_id = plain.id().unwrap();
    set.add(plain).unwrap();

    let err = builder()
        .build_secp_mint_tx(
            &set,
            &plain_id,
            10,
            &[addr(2)],
            &[owner],
            &[owner],
            0,
            avax(),
            Vec::new(),
            0,
        )
        .unwrap_err();
    assert!(matches!(err, WalletError::Config(_)));
}

#[test]
fn evm_transactions_decode_through_the_evm_registry() {
    let atomic = transfer_utxo(1, 0, avax(), 100, 1, vec![addr(1)]);
    let import = builder()
        .build_evm_import_tx(
            &[atomic],
            BlockchainId::new([0x20; 32]),
            addr(0xEE),
            &[addr(1)],
            10,
            0,
        )
        .unwrap();
    let bytes = import.to_bytes().unwrap();
    let decoded = UnsignedTx::from_bytes_evm(&bytes).unwrap();
    assert_eq!(decoded.to_bytes().unwrap(), bytes);

    let export = builder()
        .build_evm_export_tx(
            70,
            avax(),
            BlockchainId::new([0x30; 32]),
            addr(0xEE),
            5,
            &[addr(2)],
            1,
            0,
            1,
        )
        .unwrap()
        .unwrap();
    let bytes = export.to_bytes().unwrap();
    let decoded = UnsignedTx::from_bytes_evm(&bytes).unwrap();
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn built_tx_signs_and_serializes_end_to_end() {
    let mut kc = KeyChain::new(NetworkId::Local, ChainAlias::X);
    let owner = kc.make();
    let a = asset(1);

    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 1000, 1, vec![owner])).unwrap();

    let unsigned = builder()
        .build_base_tx(
            &set,
            250,
            a,
            &[addr(2)],
            &[owner],
            &[owner],
            10,
            a,
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap()
        .unwrap();
    let unsigned_bytes = unsigned.to_bytes().unwrap();

    let signed = kc.sign_tx(unsigned).unwrap();
    assert_eq!(signed.credentials.len(), 1);
    assert_eq!(signed.credentials[0].signatures.len(), 1);

    let sig = &signed.credentials[0].signatures[0];
    let key = kc.get_key(&owner).unwrap();
    assert!(avax_crypto::verify(&unsigned_bytes, sig, &key.public));

    let bytes = signed.to_bytes().unwrap();
    assert_eq!(&bytes[..unsigned_bytes.len()], unsigned_bytes.as_slice());
    assert!(!signed.tx_id().unwrap().is_zero());
}

#[test]
fn signing_without_the_key_fails_whole_tx() {
    let a = asset(1);
    let stranger = addr(0x77);
    let mut set = UtxoSet::new();
    set.add(transfer_utxo(1, 0, a, 100, 1, vec![stranger])).unwrap();

    let unsigned = builder()
        .build_base_tx(
            &set,
            50,
            a,
            &[addr(2)],
            &[stranger],
            &[stranger],
            0,
            a,
            Vec::new(),
            0,
            0,
            1,
        )
        .unwrap()
        .unwrap();

    let kc = KeyChain::new(NetworkId::Local, ChainAlias::X);
    assert_eq!(
        kc.sign_tx(unsigned).unwrap_err(),
        WalletError::MissingKey(stranger)
    );
}
