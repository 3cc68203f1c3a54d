use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// PancakeSwap V2 charges a flat 0.25% on every pair.
pub const V2_POOL_FEE: u32 = 2500;
/// Uniswap V2 pairs charge 0.3%.
pub const UNISWAP_V2_POOL_FEE: u32 = 3000;

/// A V2 pair. The fee is implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKeyV2 {
    pub token0: Address,
    pub token1: Address,
}

impl PoolKeyV2 {
    pub fn new(token0: Address, token1: Address) -> Self {
        Self { token0, token1 }
    }

    pub fn sorted(a: Address, b: Address) -> Self {
        if a < b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    pub fn contains(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }
}
