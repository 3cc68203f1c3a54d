use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::core_sdk::{
    address_book::AddressBook,
    chain::{ChainId, UnsupportedChain},
    weth9::Weth9,
};
use crate::v2_sdk::uniswapv2_pool::V2_POOL_FEE;

pub const DEFAULT_DEADLINE_SECS: u64 = 600;
/// Upper bound accepted for `deadline_secs` (one year).
pub const MAX_DEADLINE_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    UnsupportedChain(#[from] UnsupportedChain),

    #[error("no router deployment known for {0:?}")]
    NoDeployment(ChainId),

    #[error("invalid value {value:?} for {name}")]
    InvalidVar { name: &'static str, value: String },
}

/// Contracts and knobs shared by every swap the router client builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub chain_id: ChainId,
    pub universal_router: Address,
    pub permit2: Address,
    /// wrapped-native sentinel (WBNB, WETH)
    pub wrapped_native: Address,
    pub v3_quoter: Address,
    pub cl_pool_manager: Option<Address>,
    /// Fee reported for V2 swaps (2500 on PancakeSwap, 3000 on Uniswap).
    #[serde(default = "default_v2_pool_fee")]
    pub v2_pool_fee: u32,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
    /// Read the Permit2 allowance and fail before sending when it is short.
    #[serde(default)]
    pub check_allowance: bool,
}

fn default_deadline_secs() -> u64 {
    DEFAULT_DEADLINE_SECS
}

fn default_v2_pool_fee() -> u32 {
    V2_POOL_FEE
}

impl RouterConfig {
    pub fn for_chain(chain_id: ChainId) -> Result<Self, ConfigError> {
        let book = AddressBook::for_chain(chain_id).ok_or(ConfigError::NoDeployment(chain_id))?;
        Ok(Self {
            chain_id,
            universal_router: book.universal_router,
            permit2: book.permit2,
            wrapped_native: Weth9::from(chain_id).address,
            v3_quoter: book.v3_quoter,
            cl_pool_manager: book.cl_pool_manager,
            v2_pool_fee: book.v2_pool_fee,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            check_allowance: false,
        })
    }

    /// Loads `.env` and reads `UR_*` variables on top of the chain defaults (BNB Chain
    /// when `UR_CHAIN_ID` is unset).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let chain_id = match lookup("UR_CHAIN_ID") {
            Some(value) => ChainId::try_from(parse_var::<u64>("UR_CHAIN_ID", &value)?)?,
            None => ChainId::Bnb,
        };
        let mut config = Self::for_chain(chain_id)?;

        if let Some(value) = lookup("UR_UNIVERSAL_ROUTER") {
            config.universal_router = parse_var("UR_UNIVERSAL_ROUTER", &value)?;
        }
        if let Some(value) = lookup("UR_PERMIT2") {
            config.permit2 = parse_var("UR_PERMIT2", &value)?;
        }
        if let Some(value) = lookup("UR_WRAPPED_NATIVE") {
            config.wrapped_native = parse_var("UR_WRAPPED_NATIVE", &value)?;
        }
        if let Some(value) = lookup("UR_V3_QUOTER") {
            config.v3_quoter = parse_var("UR_V3_QUOTER", &value)?;
        }
        if let Some(value) = lookup("UR_CL_POOL_MANAGER") {
            config.cl_pool_manager = Some(parse_var("UR_CL_POOL_MANAGER", &value)?);
        }
        if let Some(value) = lookup("UR_V2_POOL_FEE") {
            config.v2_pool_fee = parse_var("UR_V2_POOL_FEE", &value)?;
        }
        if let Some(value) = lookup("UR_DEADLINE_SECS") {
            let deadline_secs: u64 = parse_var("UR_DEADLINE_SECS", &value)?;
            if deadline_secs > MAX_DEADLINE_SECS {
                return Err(ConfigError::InvalidVar {
                    name: "UR_DEADLINE_SECS",
                    value,
                });
            }
            config.deadline_secs = deadline_secs;
        }
        if let Some(value) = lookup("UR_CHECK_ALLOWANCE") {
            config.check_allowance = parse_var("UR_CHECK_ALLOWANCE", &value)?;
        }
        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
    })
}
