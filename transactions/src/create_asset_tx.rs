//! Asset creation. The id of the accepted transaction becomes the new
//! asset's id.

use crate::base_tx::BaseTx;
use crate::error::TxError;
use crate::outputs::Output;
use crate::put_count;
use avax_codec::{ByteReader, ByteWriter};

/// Type id of an asset creation transaction (X chain).
pub const CREATE_ASSET_TX_ID: u32 = 0x0000_0001;

/// Fx id of the SECP fungible feature extension.
pub const SECP_FX_ID: u32 = 0x0000_0000;
/// Fx id of the NFT feature extension.
pub const NFT_FX_ID: u32 = 0x0000_0001;

/// Maximum asset name length in bytes.
pub const MAX_NAME_LEN: usize = 128;
/// Maximum asset symbol length in bytes.
pub const MAX_SYMBOL_LEN: usize = 4;
/// Maximum denomination (decimal places).
pub const MAX_DENOMINATION: u8 = 32;

/// The genesis outputs of one feature extension for a new asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialState {
    pub fx_id: u32,
    pub outputs: Vec<Output>,
}

impl InitialState {
    /// Outputs are kept sorted by serialized bytes.
    pub fn new(fx_id: u32, outputs: Vec<Output>) -> Result<Self, TxError> {
        let mut keyed = outputs
            .into_iter()
            .map(|o| Ok((o.to_bytes()?, o)))
            .collect::<Result<Vec<_>, TxError>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self {
            fx_id,
            outputs: keyed.into_iter().map(|(_, o)| o).collect(),
        })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        w.put_u32(self.fx_id);
        put_count(w, self.outputs.len())?;
        for out in &self.outputs {
            out.write(w)?;
        }
        Ok(())
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let fx_id = r.get_u32()?;
        let count = r.get_u32()? as usize;
        let mut outputs = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            outputs.push(Output::from_reader(r)?);
        }
        Self::new(fx_id, outputs)
    }
}

/// Creates a new asset family and its genesis outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAssetTx {
    pub base: BaseTx,
    pub name: String,
    pub symbol: String,
    pub denomination: u8,
    /// One entry per feature extension, sorted by fx id.
    pub initial_states: Vec<InitialState>,
}

impl CreateAssetTx {
    pub fn new(
        base: BaseTx,
        name: String,
        symbol: String,
        denomination: u8,
        mut initial_states: Vec<InitialState>,
    ) -> Result<Self, TxError> {
        if name.len() > MAX_NAME_LEN {
            return Err(TxError::Config(format!(
                "asset name is {} bytes, limit is {MAX_NAME_LEN}",
                name.len()
            )));
        }
        if symbol.len() > MAX_SYMBOL_LEN {
            return Err(TxError::Config(format!(
                "asset symbol is {} bytes, limit is {MAX_SYMBOL_LEN}",
                symbol.len()
            )));
        }
        if denomination > MAX_DENOMINATION {
            return Err(TxError::Config(format!(
                "denomination {denomination} exceeds {MAX_DENOMINATION}"
            )));
        }
        initial_states.sort_by_key(|s| s.fx_id);
        Ok(Self {
            base,
            name,
            symbol,
            denomination,
            initial_states,
        })
    }

    pub fn write_body(&self, w: &mut ByteWriter) -> Result<(), TxError> {
        self.base.write_body(w)?;
        w.put_short_str(&self.name)?;
        w.put_short_str(&self.symbol)?;
        w.put_u8(self.denomination);
        put_count(w, self.initial_states.len())?;
        for state in &self.initial_states {
            state.write(w)?;
        }
        Ok(())
    }

    pub fn read_body(r: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let base = BaseTx::read_body(r)?;
        let name = r.get_short_str()?;
        let symbol = r.get_short_str()?;
        let denomination = r.get_u8()?;
        let count = r.get_u32()? as usize;
        let mut initial_states = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            initial_states.push(InitialState::read(r)?);
        }
        Self::new(base, name, symbol, denomination, initial_states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::{OutputOwners, SecpMintOutput, SecpTransferOutput};
    use avax_types::{Address, BlockchainId};

    fn base() -> BaseTx {
        BaseTx::new(1, BlockchainId::new([1u8; 32]), Vec::new(), Vec::new(), Vec::new()).unwrap()
    }

    fn genesis_state() -> InitialState {
        let addr = Address::new([1u8; 20]);
        InitialState::new(
            SECP_FX_ID,
            vec![
                Output::SecpTransfer(
                    SecpTransferOutput::new(1_000_000, 0, 1, vec![addr]).unwrap(),
                ),
                Output::SecpMint(SecpMintOutput {
                    owners: OutputOwners::new(0, 1, vec![addr]).unwrap(),
                }),
            ],
        )
        .unwrap()
    }

    #[test]
    fn guards_on_name_symbol_denomination() {
        assert!(CreateAssetTx::new(base(), "x".repeat(129), "T".into(), 0, vec![]).is_err());
        assert!(CreateAssetTx::new(base(), "Token".into(), "TOKEN".into(), 0, vec![]).is_err());
        assert!(CreateAssetTx::new(base(), "Token".into(), "TOK".into(), 33, vec![]).is_err());
        assert!(CreateAssetTx::new(base(), "Token".into(), "TOK".into(), 9, vec![]).is_ok());
    }

    #[test]
    fn initial_state_outputs_sorted_by_bytes() {
        let state = genesis_state();
        let bytes: Vec<Vec<u8>> = state
            .outputs
            .iter()
            .map(|o| o.to_bytes().unwrap())
            .collect();
        assert!(bytes[0] < bytes[1]);
    }

    #[test]
    fn body_byte_roundtrip() {
        let tx = CreateAssetTx::new(
            base(),
            "Test Token".into(),
            "TST".into(),
            9,
            vec![genesis_state()],
        )
        .unwrap();
        let mut w = ByteWriter::new();
        tx.write_body(&mut w).unwrap();
        let bytes = w.into_bytes();

        let mut r = ByteReader::new(&bytes);
        let decoded = CreateAssetTx::read_body(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(decoded.name, "Test Token");
        assert_eq!(decoded.symbol, "TST");
        assert_eq!(decoded.denomination, 9);

        let mut again = ByteWriter::new();
        decoded.write_body(&mut again).unwrap();
        assert_eq!(again.into_bytes(), bytes);
    }
}
