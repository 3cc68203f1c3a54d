use std::fmt;

use alloy::{
    primitives::{Address, Log, B256, I256, U256},
    sol,
};
use alloy_sol_types::SolEvent;
use serde::Serialize;
use tracing::debug;

use super::{universal_router_client::TxReceipt, universal_router_commands::UniversalRouterError};

mod v2 {
    alloy::sol! {
        #[allow(missing_docs)]
        event Swap(address indexed sender, uint256 amount0In, uint256 amount1In, uint256 amount0Out, uint256 amount1Out, address indexed to);
    }
}

mod v3 {
    alloy::sol! {
        #[allow(missing_docs)]
        event Swap(address indexed sender, address indexed recipient, int256 amount0, int256 amount1, uint160 sqrtPriceX96, uint128 liquidity, int24 tick);
    }
}

mod pancake_v3 {
    alloy::sol! {
        #[allow(missing_docs)]
        event Swap(address indexed sender, address indexed recipient, int256 amount0, int256 amount1, uint160 sqrtPriceX96, uint128 liquidity, int24 tick, uint128 protocolFeesToken0, uint128 protocolFeesToken1);
    }
}

sol! {
    #[allow(missing_docs)]
    event Swap(bytes32 indexed id, address indexed sender, int128 amount0, int128 amount1, uint160 sqrtPriceX96, uint128 liquidity, int24 tick, uint24 fee, uint16 protocolFee);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoolVersion {
    V2,
    V3,
    V4,
}

impl fmt::Display for PoolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolVersion::V2 => write!(f, "v2"),
            PoolVersion::V3 => write!(f, "v3"),
            PoolVersion::V4 => write!(f, "v4"),
        }
    }
}

/// What the caller knows about the swap before reading the receipt.
#[derive(Debug, Clone)]
pub struct ExpectedSwap {
    pub version: PoolVersion,
    pub user: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub zero_for_one: bool,
    /// Emitting contract, when known (pool for V2/V3, pool manager for V4).
    pub emitter: Option<Address>,
    /// V4 only: the pool id in topic 1.
    pub pool_id: Option<B256>,
    /// Fee to report for V2 and V3; V4 reads it from the event.
    pub pool_fee: u32,
}

/// A confirmed swap as read back from its receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapResult {
    pub user_address: Address,
    pub input_token: Address,
    pub input_amount: U256,
    pub output_token: Address,
    pub output_amount: U256,
    pub network_fee: U256,
    pub tx_id: B256,
    pub block_number: u64,
    pub liquidity: U256,
    pub fee: u32,
    pub protocol_fee: U256,
    pub pool_version: PoolVersion,
}

fn first_match<'a>(
    logs: &'a [Log],
    topics0: &[B256],
    expected: &ExpectedSwap,
) -> Option<&'a Log> {
    logs.iter().find(|log| {
        let topics = log.data.topics();
        let Some(topic0) = topics.first() else {
            return false;
        };
        if !topics0.contains(topic0) {
            return false;
        }
        if let Some(emitter) = expected.emitter {
            if log.address != emitter {
                return false;
            }
        }
        match expected.pool_id {
            Some(id) => topics.get(1) == Some(&id),
            None => true,
        }
    })
}

fn decode_err(e: alloy::sol_types::Error) -> UniversalRouterError {
    UniversalRouterError::AbiDecode(e.to_string())
}

/// (input, output) from signed pool deltas: the input side is positive, the output side negative.
fn split_pool_deltas(
    amount0: I256,
    amount1: I256,
    zero_for_one: bool,
) -> Result<(U256, U256), UniversalRouterError> {
    let (amount_in, amount_out) = if zero_for_one {
        (amount0, amount1)
    } else {
        (amount1, amount0)
    };
    if amount_in.is_negative() || amount_out.is_positive() {
        return Err(UniversalRouterError::UnexpectedSign(format!(
            "in {amount_in}, out {amount_out}"
        )));
    }
    Ok((amount_in.unsigned_abs(), amount_out.unsigned_abs()))
}

/// Reads the first matching pool `Swap` log of `receipt`. Later matches are ignored.
pub fn extract_swap(
    receipt: &TxReceipt,
    expected: &ExpectedSwap,
) -> Result<SwapResult, UniversalRouterError> {
    let no_match = || UniversalRouterError::NoMatchingLog(expected.version);
    let zero_for_one = expected.zero_for_one;

    let (input_amount, output_amount, liquidity, fee, protocol_fee) = match expected.version {
        PoolVersion::V2 => {
            let log = first_match(&receipt.logs, &[v2::Swap::SIGNATURE_HASH], expected)
                .ok_or_else(no_match)?;
            let event = v2::Swap::decode_log_data(&log.data, true).map_err(decode_err)?;
            let (amount_in, amount_out) = if zero_for_one {
                (event.amount0In, event.amount1Out)
            } else {
                (event.amount1In, event.amount0Out)
            };
            (amount_in, amount_out, U256::ZERO, expected.pool_fee, U256::ZERO)
        }
        PoolVersion::V3 => {
            let log = first_match(
                &receipt.logs,
                &[pancake_v3::Swap::SIGNATURE_HASH, v3::Swap::SIGNATURE_HASH],
                expected,
            )
            .ok_or_else(no_match)?;
            if log.data.topics()[0] == pancake_v3::Swap::SIGNATURE_HASH {
                let event =
                    pancake_v3::Swap::decode_log_data(&log.data, true).map_err(decode_err)?;
                let (amount_in, amount_out) =
                    split_pool_deltas(event.amount0, event.amount1, zero_for_one)?;
                let protocol_fee = if zero_for_one {
                    event.protocolFeesToken0
                } else {
                    event.protocolFeesToken1
                };
                (
                    amount_in,
                    amount_out,
                    U256::from(event.liquidity),
                    expected.pool_fee,
                    U256::from(protocol_fee),
                )
            } else {
                let event = v3::Swap::decode_log_data(&log.data, true).map_err(decode_err)?;
                let (amount_in, amount_out) =
                    split_pool_deltas(event.amount0, event.amount1, zero_for_one)?;
                (
                    amount_in,
                    amount_out,
                    U256::from(event.liquidity),
                    expected.pool_fee,
                    U256::ZERO,
                )
            }
        }
        PoolVersion::V4 => {
            let log = first_match(&receipt.logs, &[Swap::SIGNATURE_HASH], expected)
                .ok_or_else(no_match)?;
            let event = Swap::decode_log_data(&log.data, true).map_err(decode_err)?;
            let (amount_in, amount_out) = if zero_for_one {
                (event.amount0, event.amount1)
            } else {
                (event.amount1, event.amount0)
            };
            (
                U256::from(amount_in.unsigned_abs()),
                U256::from(amount_out.unsigned_abs()),
                U256::from(event.liquidity),
                event.fee.to::<u32>(),
                U256::from(event.protocolFee),
            )
        }
    };

    let network_fee = receipt.effective_gas_price.saturating_mul(receipt.gas_used);
    debug!(
        tx_hash = %receipt.tx_hash,
        version = %expected.version,
        %input_amount,
        %output_amount,
        "swap log extracted"
    );

    Ok(SwapResult {
        user_address: expected.user,
        input_token: expected.token_in,
        input_amount,
        output_token: expected.token_out,
        output_amount,
        network_fee,
        tx_id: receipt.tx_hash,
        block_number: receipt.block_number,
        liquidity,
        fee,
        protocol_fee,
        pool_version: expected.version,
    })
}
