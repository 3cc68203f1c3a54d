use alloy::{
    primitives::{aliases::U24, Address, Bytes, U160, U256},
    sol,
    sol_types::SolCall,
};
use tracing::debug;

use crate::universal_router_sdk::universal_router_client::ContractCaller;

sol! {
    #[allow(missing_docs)]
    struct QuoteExactInputSingleParams {
        address tokenIn;
        address tokenOut;
        uint256 amountIn;
        uint24 fee;
        uint160 sqrtPriceLimitX96;
    }

    #[allow(missing_docs)]
    struct QuoteExactOutputSingleParams {
        address tokenIn;
        address tokenOut;
        uint256 amount;
        uint24 fee;
        uint160 sqrtPriceLimitX96;
    }

    #[allow(missing_docs)]
    function quoteExactInputSingle(QuoteExactInputSingleParams memory params)
        external
        returns (uint256 amountOut, uint160 sqrtPriceX96After, uint32 initializedTicksCrossed, uint256 gasEstimate);

    #[allow(missing_docs)]
    function quoteExactOutputSingle(QuoteExactOutputSingleParams memory params)
        external
        returns (uint256 amountIn, uint160 sqrtPriceX96After, uint32 initializedTicksCrossed, uint256 gasEstimate);
}

const MAX_FEE: u32 = 0x00ff_ffff;
pub const MAX_SLIPPAGE_BPS: u32 = 10_000;

#[derive(Debug, Clone)]
pub enum UniswapV3QuoterCommand {
    /// given the amount you want to swap, produces a quote for the amount out of a single pool
    QuoteExactInputSingle {
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    },
    /// given the amount you want to get out, produces a quote for the amount in of a single pool
    QuoteExactOutputSingle {
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_out: U256,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniswapV3QuoterResult {
    QuoteExactInputSingle(U256),
    QuoteExactOutputSingle(U256),
}

impl UniswapV3QuoterResult {
    pub fn amount(&self) -> U256 {
        match self {
            Self::QuoteExactInputSingle(amount) | Self::QuoteExactOutputSingle(amount) => *amount,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UniswapV3QuoterError {
    #[error("pool fee {0} overflows uint24")]
    WrongPoolFee(u32),

    #[error("quoter call failed: {0}")]
    CallFailed(#[from] anyhow::Error),

    #[error("cannot decode quoter response: {0}")]
    InvalidResponse(String),
}

fn fee_to_u24(fee: u32) -> Result<U24, UniswapV3QuoterError> {
    if fee > MAX_FEE {
        return Err(UniswapV3QuoterError::WrongPoolFee(fee));
    }
    Ok(U24::from(fee))
}

pub async fn execute<C: ContractCaller + ?Sized>(
    caller: &C,
    quoter: Address,
    command: UniswapV3QuoterCommand,
) -> Result<UniswapV3QuoterResult, UniswapV3QuoterError> {
    match command {
        UniswapV3QuoterCommand::QuoteExactInputSingle {
            token_in,
            token_out,
            fee,
            amount_in,
        } => {
            let call = quoteExactInputSingleCall {
                params: QuoteExactInputSingleParams {
                    tokenIn: token_in,
                    tokenOut: token_out,
                    amountIn: amount_in,
                    fee: fee_to_u24(fee)?,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            };
            let output = caller.call(quoter, Bytes::from(call.abi_encode())).await?;
            let decoded = quoteExactInputSingleCall::abi_decode_returns(&output, true)
                .map_err(|e| UniswapV3QuoterError::InvalidResponse(e.to_string()))?;
            debug!(%token_in, %token_out, fee, %amount_in, amount_out = %decoded.amountOut, "v3 quote");
            Ok(UniswapV3QuoterResult::QuoteExactInputSingle(
                decoded.amountOut,
            ))
        }
        UniswapV3QuoterCommand::QuoteExactOutputSingle {
            token_in,
            token_out,
            fee,
            amount_out,
        } => {
            let call = quoteExactOutputSingleCall {
                params: QuoteExactOutputSingleParams {
                    tokenIn: token_in,
                    tokenOut: token_out,
                    amount: amount_out,
                    fee: fee_to_u24(fee)?,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            };
            let output = caller.call(quoter, Bytes::from(call.abi_encode())).await?;
            let decoded = quoteExactOutputSingleCall::abi_decode_returns(&output, true)
                .map_err(|e| UniswapV3QuoterError::InvalidResponse(e.to_string()))?;
            Ok(UniswapV3QuoterResult::QuoteExactOutputSingle(
                decoded.amountIn,
            ))
        }
    }
}

/// `quote * (10000 - bps) / 10000`, rounded down. `bps` must already be within `0..=10000`.
pub fn apply_slippage(quote: U256, slippage_bps: u32) -> U256 {
    let keep = U256::from(MAX_SLIPPAGE_BPS.saturating_sub(slippage_bps));
    let denominator = U256::from(MAX_SLIPPAGE_BPS);
    match quote.checked_mul(keep) {
        Some(scaled) => scaled / denominator,
        None => quote / denominator * keep,
    }
}
