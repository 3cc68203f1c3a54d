pub use alloy::hex;
pub use alloy::primitives::{Address, Bytes, B256, U160, U256};
pub use anyhow::Result;
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
pub use serde::{Deserialize, Serialize};
pub use std::str::FromStr;

pub use crate::config::RouterConfig;
pub use crate::core_sdk::{chain::ChainId, weth9::Weth9};
pub use crate::universal_router_sdk::{
    swap_result::{PoolVersion, SwapResult},
    universal_router_client::{connect_http, AlloyTransport, ContractCaller, TransactionSender},
    universal_router_commands::UniversalRouterError,
    universal_router_decoder::decode_commands,
    universal_router_swap::{SwapOptions, SwapOptionsBuilder, UniversalRouterSwapper},
};
pub use crate::v2_sdk::uniswapv2_pool::PoolKeyV2;
pub use crate::v3_sdk::uniswapv3_pool::{PoolKeyV3, UniswapPoolFee};
pub use crate::v4_sdk::v4_pool_key::PoolKeyV4;
