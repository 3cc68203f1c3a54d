use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    Mainnet = 1,
    Bnb = 56,
    BnbTestnet = 97,
    Base = 8453,
    ArbitrumOne = 42161,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported chain id: {0}")]
pub struct UnsupportedChain(pub u64);

impl From<ChainId> for u64 {
    fn from(chain_id: ChainId) -> Self {
        chain_id as u64
    }
}

impl TryFrom<u64> for ChainId {
    type Error = UnsupportedChain;

    fn try_from(chain_id: u64) -> Result<Self, Self::Error> {
        match chain_id {
            1 => Ok(Self::Mainnet),
            56 => Ok(Self::Bnb),
            97 => Ok(Self::BnbTestnet),
            8453 => Ok(Self::Base),
            42161 => Ok(Self::ArbitrumOne),
            _ => Err(UnsupportedChain(chain_id)),
        }
    }
}
