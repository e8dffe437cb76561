//! Key management: a mapping from address to key pair, with bulk signing.

use crate::error::WalletError;
use avax_codec::address_to_string;
use avax_crypto::{address_from_pubkey, generate_keypair, keypair_from_private, sign};
use avax_transactions::{Credential, SignedTx, UnsignedTx};
use avax_types::{Address, ChainAlias, KeyPair, NetworkId, PrivateKey};
use std::collections::BTreeMap;

/// Holds the key pairs a wallet controls on one chain of one network.
///
/// Signing walks a transaction's inputs in order, resolves each signature
/// slot's address against the chain, and emits one credential per input.
pub struct KeyChain {
    network: NetworkId,
    chain: ChainAlias,
    keys: BTreeMap<Address, KeyPair>,
}

impl KeyChain {
    pub fn new(network: NetworkId, chain: ChainAlias) -> Self {
        Self {
            network,
            chain,
            keys: BTreeMap::new(),
        }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn chain(&self) -> ChainAlias {
        self.chain
    }

    /// Generate a fresh key pair, insert it, and return its address.
    pub fn make(&mut self) -> Address {
        let pair = generate_keypair();
        let addr = address_from_pubkey(&pair.public);
        self.keys.insert(addr, pair);
        addr
    }

    /// Import an existing private key, returning its derived address.
    pub fn import_key(&mut self, private: PrivateKey) -> Result<Address, WalletError> {
        let pair = keypair_from_private(private)?;
        let addr = address_from_pubkey(&pair.public);
        self.keys.insert(addr, pair);
        Ok(addr)
    }

    pub fn has_key(&self, addr: &Address) -> bool {
        self.keys.contains_key(addr)
    }

    pub fn get_key(&self, addr: &Address) -> Option<&KeyPair> {
        self.keys.get(addr)
    }

    /// All controlled addresses, ascending.
    pub fn addresses(&self) -> Vec<Address> {
        self.keys.keys().copied().collect()
    }

    /// All controlled addresses in their chain-qualified textual form.
    pub fn address_strings(&self) -> Vec<String> {
        self.keys
            .keys()
            .map(|a| address_to_string(self.network, self.chain, a))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sign every input of `unsigned`, consuming it into an immutable signed
    /// transaction.
    ///
    /// Fails with [`WalletError::MissingKey`] if any required signer is not
    /// on the chain; no partial result is produced.
    pub fn sign_tx(&self, unsigned: UnsignedTx) -> Result<SignedTx, WalletError> {
        let bytes = unsigned.to_bytes()?;
        let plan = unsigned.credential_addresses();

        let mut credentials = Vec::with_capacity(plan.len());
        for signers in &plan {
            let mut signatures = Vec::with_capacity(signers.len());
            for addr in signers {
                let pair = self
                    .keys
                    .get(addr)
                    .ok_or(WalletError::MissingKey(*addr))?;
                signatures.push(sign(&pair.private, &bytes)?);
            }
            credentials.push(Credential::new(signatures));
        }
        Ok(SignedTx::new(unsigned, credentials)?)
    }
}
