use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolValue,
};
use serde::Serialize;

use super::{
    v4_actions::{
        ActionData, ActionParams, ActionType, ClSwapExactInSingleParams, SettleAllParams,
        SettleParams, TakeAllParams, TakeParams, OPEN_DELTA,
    },
    v4_pool_key::PoolKeyV4,
};
use crate::universal_router_sdk::universal_router_commands::{UniversalRouterError, ADDRESS_THIS};

/// Ordered actions run by the vault inside one `INFI_SWAP` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub actions: Vec<ActionData>,
}

impl ActionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, action: ActionType, params: ActionParams) -> Self {
        self.actions.push(ActionData::new(action, params));
        self
    }

    /// `(actions, params)`, one opcode byte per params blob.
    pub fn encode(&self) -> Result<(Bytes, Vec<Bytes>), UniversalRouterError> {
        let actions = self.actions.iter().map(|a| a.opcode).collect::<Vec<u8>>();
        let params = self
            .actions
            .iter()
            .map(|a| a.params.encode())
            .collect::<Result<Vec<_>, _>>()?;
        Ok((actions.into(), params))
    }

    pub fn decode(actions: &[u8], params: &[Bytes]) -> Result<Self, UniversalRouterError> {
        if actions.len() != params.len() {
            return Err(UniversalRouterError::InvalidPayload(format!(
                "{} actions with {} params",
                actions.len(),
                params.len()
            )));
        }
        Ok(Self {
            actions: actions
                .iter()
                .zip(params)
                .map(|(action, data)| ActionData::decode(*action, data))
                .collect(),
        })
    }

    /// Router input of `INFI_SWAP`: `abi.encode(bytes actions, bytes[] params)`.
    pub fn encode_swap_input(&self) -> Result<Bytes, UniversalRouterError> {
        let (actions, params) = self.encode()?;
        Ok((actions, params).abi_encode_params().into())
    }

    pub fn decode_swap_input(input: &[u8]) -> Result<Self, UniversalRouterError> {
        let (actions, params) = <(Bytes, Vec<Bytes>)>::abi_decode_params(input, true)
            .map_err(|e| UniversalRouterError::AbiDecode(e.to_string()))?;
        Self::decode(&actions, &params)
    }
}

/// Which side of the vault settlement goes through the router's own balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterSettlement {
    /// input was wrapped inside the router: `SETTLE` with `payerIsUser = false`
    pub router_pays: bool,
    /// output is unwrapped by the router afterwards: `TAKE` to `ADDRESS_THIS`
    pub router_takes: bool,
}

/// Exact-input single-pool swap: `CL_SWAP_EXACT_IN_SINGLE`, `SETTLE_ALL`, `TAKE_ALL`.
pub fn build_v4_action_plan(
    pool_key: &PoolKeyV4,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
) -> Result<ActionPlan, UniversalRouterError> {
    build_v4_routed_action_plan(
        pool_key,
        token_in,
        amount_in,
        amount_out_minimum,
        RouterSettlement::default(),
    )
}

/// Same three-step shape. `SETTLE_ALL` becomes a router-paid `SETTLE` and `TAKE_ALL`
/// a `TAKE` into the router when the matching `settlement` flag is set.
pub fn build_v4_routed_action_plan(
    pool_key: &PoolKeyV4,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
    settlement: RouterSettlement,
) -> Result<ActionPlan, UniversalRouterError> {
    if !pool_key.contains(token_in) {
        return Err(UniversalRouterError::TokenNotInPool(token_in));
    }
    let zero_for_one = token_in == pool_key.currency0;
    let token_out = if zero_for_one {
        pool_key.currency1
    } else {
        pool_key.currency0
    };
    let amount_in_u128 =
        u128::try_from(amount_in).map_err(|_| UniversalRouterError::AmountOverflow(amount_in))?;
    let amount_out_minimum_u128 = u128::try_from(amount_out_minimum)
        .map_err(|_| UniversalRouterError::AmountOverflow(amount_out_minimum))?;

    let plan = ActionPlan::new().add(
        ActionType::ClSwapExactInSingle,
        ActionParams::ClSwapExactInSingle(ClSwapExactInSingleParams {
            pool_key: *pool_key,
            zero_for_one,
            amount_in: amount_in_u128,
            amount_out_minimum: amount_out_minimum_u128,
            hook_data: Bytes::new(),
        }),
    );
    let plan = if settlement.router_pays {
        plan.add(
            ActionType::Settle,
            ActionParams::Settle(SettleParams {
                currency: token_in,
                amount: amount_in,
                payer_is_user: false,
            }),
        )
    } else {
        plan.add(
            ActionType::SettleAll,
            ActionParams::SettleAll(SettleAllParams {
                currency: token_in,
                max_amount: amount_in,
            }),
        )
    };
    let plan = if settlement.router_takes {
        plan.add(
            ActionType::Take,
            ActionParams::Take(TakeParams {
                currency: token_out,
                recipient: ADDRESS_THIS,
                amount: OPEN_DELTA,
            }),
        )
    } else {
        plan.add(
            ActionType::TakeAll,
            ActionParams::TakeAll(TakeAllParams {
                currency: token_out,
                min_amount: amount_out_minimum,
            }),
        )
    };
    Ok(plan)
}
