use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniswapPoolFee {
    Fee10000, // 1%
    Fee3000,  // 0.3%
    Fee2500,  // 0.25%, PancakeSwap
    Fee500,   // 0.05%
    Fee100,   // 0.01%
}

impl UniswapPoolFee {
    pub fn as_u32(&self) -> u32 {
        match self {
            UniswapPoolFee::Fee10000 => 10000,
            UniswapPoolFee::Fee3000 => 3000,
            UniswapPoolFee::Fee2500 => 2500,
            UniswapPoolFee::Fee500 => 500,
            UniswapPoolFee::Fee100 => 100,
        }
    }
}

impl TryFrom<u32> for UniswapPoolFee {
    type Error = u32;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        match fee {
            10000 => Ok(UniswapPoolFee::Fee10000),
            3000 => Ok(UniswapPoolFee::Fee3000),
            2500 => Ok(UniswapPoolFee::Fee2500),
            500 => Ok(UniswapPoolFee::Fee500),
            100 => Ok(UniswapPoolFee::Fee100),
            other => Err(other),
        }
    }
}

/// A V3 pool, identified by its pair and fee tier (hundredths of a bip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKeyV3 {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
}

impl PoolKeyV3 {
    /// Orders the pair the way the factory does (`token0 < token1`).
    pub fn sorted(a: Address, b: Address, fee: u32) -> Self {
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };
        Self {
            token0,
            token1,
            fee,
        }
    }

    pub fn contains(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }
}
