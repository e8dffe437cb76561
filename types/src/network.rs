//! Network and chain identification.

use serde::{Deserialize, Serialize};

/// Identifies which Avalanche network addresses and transactions belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// The production network.
    Mainnet,
    /// The public test network.
    Fuji,
    /// Local development network.
    Local,
}

impl NetworkId {
    /// Numeric network id carried in every transaction body.
    pub fn id(&self) -> u32 {
        match self {
            Self::Mainnet => 1,
            Self::Fuji => 5,
            Self::Local => 12345,
        }
    }

    /// Look up a network by its numeric id.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Mainnet),
            5 => Some(Self::Fuji),
            12345 => Some(Self::Local),
            _ => None,
        }
    }

    /// Bech32 human-readable part for addresses on this network.
    pub fn hrp(&self) -> &'static str {
        match self {
            Self::Mainnet => "avax",
            Self::Fuji => "fuji",
            Self::Local => "local",
        }
    }
}

/// The chain an address or transaction targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainAlias {
    /// Asset exchange chain (AVM).
    X,
    /// Platform chain (staking, subnets).
    P,
    /// Contract chain (EVM).
    C,
}

impl ChainAlias {
    /// Single-letter prefix used in textual addresses, e.g. `X-avax1...`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::P => "P",
            Self::C => "C",
        }
    }

    pub fn from_prefix(s: &str) -> Option<Self> {
        match s {
            "X" => Some(Self::X),
            "P" => Some(Self::P),
            "C" => Some(Self::C),
            _ => None,
        }
    }
}
