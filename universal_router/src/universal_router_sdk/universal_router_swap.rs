use std::sync::Arc;

use alloy::{
    hex,
    primitives::{Address, B256, U256},
};
use derive_builder::Builder;
use tracing::{debug, info};

use super::{
    swap_result::{extract_swap, ExpectedSwap, PoolVersion, SwapResult},
    universal_router_client::{ContractCaller, ExecuteTransaction, TransactionSender},
    universal_router_commands::{
        UniversalRouterCommand, UniversalRouterError, UnwrapWethParams, V2SwapExactInParams,
        V3SwapExactInParams, WrapEthParams, ADDRESS_THIS,
    },
    universal_router_execute::{build_execute_calldata, RouterPlan},
};
use crate::{
    config::RouterConfig,
    permit2_sdk::allowance::read_allowance,
    v2_sdk::uniswapv2_pool::PoolKeyV2,
    v3_sdk::{
        uniswapv3_path::V3Path,
        uniswapv3_pool::PoolKeyV3,
        uniswapv3_quoter::{self, apply_slippage, UniswapV3QuoterCommand, MAX_SLIPPAGE_BPS},
    },
    v4_sdk::{
        v4_planner::{build_v4_routed_action_plan, RouterSettlement},
        v4_pool_key::{resolve_pool_key, PoolKeyV4},
    },
};

/// Per-swap gas knobs. Unset fields are left to the provider's fillers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct SwapOptions {
    #[builder(setter(strip_option))]
    pub gas_limit: Option<u64>,
    #[builder(setter(strip_option))]
    pub max_fee_per_gas: Option<u128>,
    #[builder(setter(strip_option))]
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Who swaps and which token stands for the native currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapContext {
    pub user: Address,
    pub wrapped_native: Address,
}

/// Router commands for one exact-input swap plus what is needed to send and read it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    pub plan: RouterPlan,
    /// native value attached to `execute`
    pub value: U256,
    pub zero_for_one: bool,
    pub token_in: Address,
    pub amount_in: U256,
    pub token_out: Address,
    /// recipient of the swap command itself
    pub recipient: Address,
    pub amount_out_minimum: U256,
}

struct Route {
    zero_for_one: bool,
    token_out: Address,
    native_in: bool,
    native_out: bool,
    recipient: Address,
}

fn route(
    token0: Address,
    token1: Address,
    token_in: Address,
    ctx: &SwapContext,
) -> Result<Route, UniversalRouterError> {
    let (zero_for_one, token_out) = if token_in == token0 {
        (true, token1)
    } else if token_in == token1 {
        (false, token0)
    } else {
        return Err(UniversalRouterError::TokenNotInPool(token_in));
    };
    let native_out = token_out == ctx.wrapped_native;
    Ok(Route {
        zero_for_one,
        token_out,
        native_in: token_in == ctx.wrapped_native,
        native_out,
        recipient: if native_out { ADDRESS_THIS } else { ctx.user },
    })
}

fn assemble(
    route: Route,
    swap: UniversalRouterCommand,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
    ctx: &SwapContext,
) -> SwapPlan {
    let mut plan = RouterPlan::new();
    if route.native_in {
        plan = plan.add(UniversalRouterCommand::WrapEth(WrapEthParams {
            recipient: ADDRESS_THIS,
            amount: amount_in,
        }));
    }
    plan = plan.add(swap);
    if route.native_out {
        plan = plan.add(UniversalRouterCommand::UnwrapWeth(UnwrapWethParams {
            recipient: ctx.user,
            min_amount_out: amount_out_minimum,
        }));
    }
    SwapPlan {
        plan,
        value: if route.native_in { amount_in } else { U256::ZERO },
        zero_for_one: route.zero_for_one,
        token_in,
        amount_in,
        token_out: route.token_out,
        recipient: route.recipient,
        amount_out_minimum,
    }
}

pub fn plan_v2_swap(
    key: &PoolKeyV2,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
    ctx: &SwapContext,
) -> Result<SwapPlan, UniversalRouterError> {
    let route = route(key.token0, key.token1, token_in, ctx)?;
    let swap = UniversalRouterCommand::V2SwapExactIn(V2SwapExactInParams {
        recipient: route.recipient,
        amount_in,
        min_amount_out: amount_out_minimum,
        path: vec![token_in, route.token_out],
        payer_is_user: !route.native_in,
    });
    Ok(assemble(route, swap, token_in, amount_in, amount_out_minimum, ctx))
}

pub fn plan_v3_swap(
    key: &PoolKeyV3,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
    ctx: &SwapContext,
) -> Result<SwapPlan, UniversalRouterError> {
    let route = route(key.token0, key.token1, token_in, ctx)?;
    let path = V3Path::single_hop(token_in, key.fee, route.token_out).encode()?;
    let swap = UniversalRouterCommand::V3SwapExactIn(V3SwapExactInParams {
        recipient: route.recipient,
        amount_in,
        min_amount_out: amount_out_minimum,
        path: path.into(),
        payer_is_user: !route.native_in,
    });
    Ok(assemble(route, swap, token_in, amount_in, amount_out_minimum, ctx))
}

/// Wrapped input is settled from the router's balance and wrapped output is taken
/// into the router, so `WRAP_ETH` and `UNWRAP_WETH` bracket `INFI_SWAP` as for V2/V3.
pub fn plan_v4_swap(
    key: &PoolKeyV4,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
    ctx: &SwapContext,
) -> Result<SwapPlan, UniversalRouterError> {
    let route = route(key.currency0, key.currency1, token_in, ctx)?;
    let settlement = RouterSettlement {
        router_pays: route.native_in,
        router_takes: route.native_out,
    };
    let actions =
        build_v4_routed_action_plan(key, token_in, amount_in, amount_out_minimum, settlement)?;
    let swap = UniversalRouterCommand::InfiSwap(actions);
    Ok(assemble(route, swap, token_in, amount_in, amount_out_minimum, ctx))
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Builds, sends and reads back exact-input swaps through the Universal Router.
pub struct UniversalRouterSwapper<T> {
    transport: Arc<T>,
    config: RouterConfig,
}

impl<T> UniversalRouterSwapper<T>
where
    T: ContractCaller + TransactionSender,
{
    pub fn new(transport: Arc<T>, config: RouterConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn context(&self) -> SwapContext {
        SwapContext {
            user: self.transport.sender(),
            wrapped_native: self.config.wrapped_native,
        }
    }

    pub async fn swap_exact_input_v2(
        &self,
        key: &PoolKeyV2,
        token_in: Address,
        amount_in: U256,
        amount_out_minimum: U256,
        options: &SwapOptions,
    ) -> Result<SwapResult, UniversalRouterError> {
        let swap = plan_v2_swap(key, token_in, amount_in, amount_out_minimum, &self.context())?;
        let expected = self.expected(&swap, PoolVersion::V2, self.config.v2_pool_fee, None, None);
        self.submit(swap, expected, options).await
    }

    /// `slippage_bps == 0` sends with no minimum output and skips the quoter.
    pub async fn swap_exact_input_v3(
        &self,
        key: &PoolKeyV3,
        token_in: Address,
        amount_in: U256,
        slippage_bps: u32,
        options: &SwapOptions,
    ) -> Result<SwapResult, UniversalRouterError> {
        if slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(UniversalRouterError::SlippageOutOfRange(slippage_bps));
        }
        let ctx = self.context();
        let mut swap = plan_v3_swap(key, token_in, amount_in, U256::ZERO, &ctx)?;
        if slippage_bps > 0 {
            let quote = uniswapv3_quoter::execute(
                &*self.transport,
                self.config.v3_quoter,
                UniswapV3QuoterCommand::QuoteExactInputSingle {
                    token_in,
                    token_out: swap.token_out,
                    fee: key.fee,
                    amount_in,
                },
            )
            .await?;
            let amount_out_minimum = apply_slippage(quote.amount(), slippage_bps);
            debug!(quote = %quote.amount(), slippage_bps, %amount_out_minimum, "v3 minimum output");
            swap = plan_v3_swap(key, token_in, amount_in, amount_out_minimum, &ctx)?;
        }
        let expected = self.expected(&swap, PoolVersion::V3, key.fee, None, None);
        self.submit(swap, expected, options).await
    }

    pub async fn swap_exact_input_v4(
        &self,
        key: &PoolKeyV4,
        token_in: Address,
        amount_in: U256,
        amount_out_minimum: U256,
        options: &SwapOptions,
    ) -> Result<SwapResult, UniversalRouterError> {
        let swap = plan_v4_swap(key, token_in, amount_in, amount_out_minimum, &self.context())?;
        let expected = self.expected(
            &swap,
            PoolVersion::V4,
            key.fee,
            Some(key.pool_manager),
            Some(key.pool_id()?),
        );
        self.submit(swap, expected, options).await
    }

    pub async fn swap_exact_input_v4_by_pool_id(
        &self,
        pool_id: B256,
        token_in: Address,
        amount_in: U256,
        amount_out_minimum: U256,
        options: &SwapOptions,
    ) -> Result<SwapResult, UniversalRouterError> {
        let manager = self.config.cl_pool_manager.ok_or_else(|| {
            UniversalRouterError::InvalidPoolKey(format!(
                "no CL pool manager configured for {:?}",
                self.config.chain_id
            ))
        })?;
        let key = resolve_pool_key(&*self.transport, manager, pool_id).await?;
        debug!(%pool_id, currency0 = %key.currency0, currency1 = %key.currency1, fee = key.fee, "pool key resolved");
        self.swap_exact_input_v4(&key, token_in, amount_in, amount_out_minimum, options)
            .await
    }

    fn expected(
        &self,
        swap: &SwapPlan,
        version: PoolVersion,
        pool_fee: u32,
        emitter: Option<Address>,
        pool_id: Option<B256>,
    ) -> ExpectedSwap {
        ExpectedSwap {
            version,
            user: self.transport.sender(),
            token_in: swap.token_in,
            token_out: swap.token_out,
            zero_for_one: swap.zero_for_one,
            emitter,
            pool_id,
            pool_fee,
        }
    }

    async fn ensure_allowance(&self, token: Address, amount: U256) -> Result<(), UniversalRouterError> {
        if !self.config.check_allowance || token == self.config.wrapped_native {
            return Ok(());
        }
        let info = read_allowance(
            &*self.transport,
            self.config.permit2,
            self.transport.sender(),
            token,
            self.config.universal_router,
        )
        .await?;
        let now = unix_now();
        if info.covers(amount, now) {
            return Ok(());
        }
        Err(UniversalRouterError::InsufficientAllowance {
            token,
            required: amount,
            available: if info.is_expired(now) {
                U256::ZERO
            } else {
                info.amount
            },
        })
    }

    async fn submit(
        &self,
        swap: SwapPlan,
        expected: ExpectedSwap,
        options: &SwapOptions,
    ) -> Result<SwapResult, UniversalRouterError> {
        self.ensure_allowance(swap.token_in, swap.amount_in).await?;

        let deadline = unix_now().saturating_add(self.config.deadline_secs);
        let input = build_execute_calldata(&swap.plan, deadline)?;
        info!(
            version = %expected.version,
            commands = %hex::encode(swap.plan.command_bytes()),
            token_in = %swap.token_in,
            token_out = %swap.token_out,
            value = %swap.value,
            min_out = %swap.amount_out_minimum,
            deadline,
            "sending router swap"
        );
        let receipt = self
            .transport
            .send_and_confirm(ExecuteTransaction {
                to: self.config.universal_router,
                input,
                value: swap.value,
                gas_limit: options.gas_limit,
                max_fee_per_gas: options.max_fee_per_gas,
                max_priority_fee_per_gas: options.max_priority_fee_per_gas,
            })
            .await?;
        extract_swap(&receipt, &expected)
    }
}
