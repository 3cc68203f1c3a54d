// Infinity vault actions, nested inside an INFI_SWAP router command.
use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::{SolCall, SolType},
};
use serde::Serialize;
use tracing::warn;

use super::v4_pool_key::{PoolKey, PoolKeyV4};
use crate::universal_router_sdk::universal_router_commands::UniversalRouterError;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    struct CLSwapExactInputSingleParams {
        PoolKey poolKey;
        bool zeroForOne;
        uint128 amountIn;
        uint128 amountOutMinimum;
        bytes hookData;
    }

    #[allow(missing_docs)]
    function settle(address currency, uint256 amount, bool payerIsUser);

    #[allow(missing_docs)]
    function settleAll(address currency, uint256 maxAmount);

    #[allow(missing_docs)]
    function take(address currency, address recipient, uint256 amount);

    #[allow(missing_docs)]
    function takeAll(address currency, uint256 minAmount);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActionType {
    ClIncreaseLiquidity = 0x00,
    ClDecreaseLiquidity = 0x01,
    ClMintPosition = 0x02,
    ClBurnPosition = 0x03,
    ClIncreaseLiquidityFromDeltas = 0x04,
    ClMintPositionFromDeltas = 0x05,
    ClSwapExactInSingle = 0x06,
    ClSwapExactIn = 0x07,
    ClSwapExactOutSingle = 0x08,
    ClSwapExactOut = 0x09,
    ClDonate = 0x0a,
    Settle = 0x0b,
    SettleAll = 0x0c,
    SettlePair = 0x0d,
    Take = 0x0e,
    TakeAll = 0x0f,
    TakePortion = 0x10,
    TakePair = 0x11,
    CloseCurrency = 0x12,
    ClearOrTake = 0x13,
    Sweep = 0x14,
    Wrap = 0x15,
    Unwrap = 0x16,
    Mint6909 = 0x17,
    Burn6909 = 0x18,
    BinAddLiquidity = 0x19,
    BinRemoveLiquidity = 0x1a,
    BinAddLiquidityFromDeltas = 0x1b,
    BinSwapExactInSingle = 0x1c,
    BinSwapExactIn = 0x1d,
    BinSwapExactOutSingle = 0x1e,
    BinSwapExactOut = 0x1f,
    BinDonate = 0x20,
}

const ACTION_TABLE: [(ActionType, &str); 33] = [
    (ActionType::ClIncreaseLiquidity, "CL_INCREASE_LIQUIDITY"),
    (ActionType::ClDecreaseLiquidity, "CL_DECREASE_LIQUIDITY"),
    (ActionType::ClMintPosition, "CL_MINT_POSITION"),
    (ActionType::ClBurnPosition, "CL_BURN_POSITION"),
    (ActionType::ClIncreaseLiquidityFromDeltas, "CL_INCREASE_LIQUIDITY_FROM_DELTAS"),
    (ActionType::ClMintPositionFromDeltas, "CL_MINT_POSITION_FROM_DELTAS"),
    (ActionType::ClSwapExactInSingle, "CL_SWAP_EXACT_IN_SINGLE"),
    (ActionType::ClSwapExactIn, "CL_SWAP_EXACT_IN"),
    (ActionType::ClSwapExactOutSingle, "CL_SWAP_EXACT_OUT_SINGLE"),
    (ActionType::ClSwapExactOut, "CL_SWAP_EXACT_OUT"),
    (ActionType::ClDonate, "CL_DONATE"),
    (ActionType::Settle, "SETTLE"),
    (ActionType::SettleAll, "SETTLE_ALL"),
    (ActionType::SettlePair, "SETTLE_PAIR"),
    (ActionType::Take, "TAKE"),
    (ActionType::TakeAll, "TAKE_ALL"),
    (ActionType::TakePortion, "TAKE_PORTION"),
    (ActionType::TakePair, "TAKE_PAIR"),
    (ActionType::CloseCurrency, "CLOSE_CURRENCY"),
    (ActionType::ClearOrTake, "CLEAR_OR_TAKE"),
    (ActionType::Sweep, "SWEEP"),
    (ActionType::Wrap, "WRAP"),
    (ActionType::Unwrap, "UNWRAP"),
    (ActionType::Mint6909, "MINT_6909"),
    (ActionType::Burn6909, "BURN_6909"),
    (ActionType::BinAddLiquidity, "BIN_ADD_LIQUIDITY"),
    (ActionType::BinRemoveLiquidity, "BIN_REMOVE_LIQUIDITY"),
    (ActionType::BinAddLiquidityFromDeltas, "BIN_ADD_LIQUIDITY_FROM_DELTAS"),
    (ActionType::BinSwapExactInSingle, "BIN_SWAP_EXACT_IN_SINGLE"),
    (ActionType::BinSwapExactIn, "BIN_SWAP_EXACT_IN"),
    (ActionType::BinSwapExactOutSingle, "BIN_SWAP_EXACT_OUT_SINGLE"),
    (ActionType::BinSwapExactOut, "BIN_SWAP_EXACT_OUT"),
    (ActionType::BinDonate, "BIN_DONATE"),
];

impl ActionType {
    pub fn name(&self) -> &'static str {
        ACTION_TABLE[*self as usize].1
    }
}

impl TryFrom<u8> for ActionType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ACTION_TABLE
            .get(value as usize)
            .map(|(action, _)| *action)
            .ok_or(value)
    }
}

/// Name for any action byte, including ones outside the table.
pub fn action_name(action: u8) -> String {
    match ActionType::try_from(action) {
        Ok(action) => action.name().to_string(),
        Err(byte) => format!("UNKNOWN_0x{byte:02x}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClSwapExactInSingleParams {
    pub pool_key: PoolKeyV4,
    pub zero_for_one: bool,
    pub amount_in: u128,
    pub amount_out_minimum: u128,
    pub hook_data: Bytes,
}

/// Pays `amount` of `currency` into the vault, from the user or from the router's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettleParams {
    pub currency: Address,
    pub amount: U256,
    pub payer_is_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettleAllParams {
    pub currency: Address,
    pub max_amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TakeAllParams {
    pub currency: Address,
    pub min_amount: U256,
}

/// Withdraws `amount` of `currency` to `recipient`; `OPEN_DELTA` takes the whole credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TakeParams {
    pub currency: Address,
    pub recipient: Address,
    pub amount: U256,
}

/// `ActionConstants.OPEN_DELTA`
pub const OPEN_DELTA: U256 = U256::ZERO;

/// Typed action parameters. Anything this crate does not model stays as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum ActionParams {
    ClSwapExactInSingle(ClSwapExactInSingleParams),
    Settle(SettleParams),
    SettleAll(SettleAllParams),
    Take(TakeParams),
    TakeAll(TakeAllParams),
    Unknown(Bytes),
}

impl ActionParams {
    pub fn encode(&self) -> Result<Bytes, UniversalRouterError> {
        Ok(match self {
            Self::ClSwapExactInSingle(params) => {
                let swap = CLSwapExactInputSingleParams {
                    poolKey: params.pool_key.to_sol()?,
                    zeroForOne: params.zero_for_one,
                    amountIn: params.amount_in,
                    amountOutMinimum: params.amount_out_minimum,
                    hookData: params.hook_data.clone(),
                };
                <CLSwapExactInputSingleParams as SolType>::abi_encode(&swap).into()
            }
            Self::Settle(params) => {
                settleCall::new((params.currency, params.amount, params.payer_is_user))
                    .abi_encode()[4..]
                    .to_vec()
                    .into()
            }
            Self::Take(params) => takeCall::new((params.currency, params.recipient, params.amount))
                .abi_encode()[4..]
                .to_vec()
                .into(),
            Self::SettleAll(params) => settleAllCall::new((params.currency, params.max_amount))
                .abi_encode()[4..]
                .to_vec()
                .into(),
            Self::TakeAll(params) => takeAllCall::new((params.currency, params.min_amount))
                .abi_encode()[4..]
                .to_vec()
                .into(),
            Self::Unknown(raw) => raw.clone(),
        })
    }

    fn decode_known(action: ActionType, data: &[u8]) -> Result<Self, alloy::sol_types::Error> {
        Ok(match action {
            ActionType::ClSwapExactInSingle => {
                let decoded = <CLSwapExactInputSingleParams as SolType>::abi_decode(data, true)?;
                Self::ClSwapExactInSingle(ClSwapExactInSingleParams {
                    pool_key: PoolKeyV4::from(decoded.poolKey),
                    zero_for_one: decoded.zeroForOne,
                    amount_in: decoded.amountIn,
                    amount_out_minimum: decoded.amountOutMinimum,
                    hook_data: decoded.hookData,
                })
            }
            ActionType::Settle => {
                let decoded = settleCall::abi_decode_raw(data, true)?;
                Self::Settle(SettleParams {
                    currency: decoded.currency,
                    amount: decoded.amount,
                    payer_is_user: decoded.payerIsUser,
                })
            }
            ActionType::Take => {
                let decoded = takeCall::abi_decode_raw(data, true)?;
                Self::Take(TakeParams {
                    currency: decoded.currency,
                    recipient: decoded.recipient,
                    amount: decoded.amount,
                })
            }
            ActionType::SettleAll => {
                let decoded = settleAllCall::abi_decode_raw(data, true)?;
                Self::SettleAll(SettleAllParams {
                    currency: decoded.currency,
                    max_amount: decoded.maxAmount,
                })
            }
            ActionType::TakeAll => {
                let decoded = takeAllCall::abi_decode_raw(data, true)?;
                Self::TakeAll(TakeAllParams {
                    currency: decoded.currency,
                    min_amount: decoded.minAmount,
                })
            }
            other => {
                warn!(action = other.name(), "action params not modelled, kept raw");
                Self::Unknown(Bytes::copy_from_slice(data))
            }
        })
    }

    /// Best effort: unmodelled or undecodable actions come back as `Unknown`.
    pub fn decode(action: u8, data: &[u8]) -> Self {
        let Ok(action_type) = ActionType::try_from(action) else {
            warn!("unknown infinity action 0x{action:02x}");
            return Self::Unknown(Bytes::copy_from_slice(data));
        };
        match Self::decode_known(action_type, data) {
            Ok(params) => params,
            Err(e) => {
                warn!(action = action_type.name(), error = %e, "cannot decode action params");
                Self::Unknown(Bytes::copy_from_slice(data))
            }
        }
    }
}

/// One entry of an action plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionData {
    pub opcode: u8,
    pub action: String,
    pub params: ActionParams,
}

impl ActionData {
    pub fn new(action: ActionType, params: ActionParams) -> Self {
        Self {
            opcode: action as u8,
            action: action.name().to_string(),
            params,
        }
    }

    pub fn decode(opcode: u8, data: &[u8]) -> Self {
        Self {
            opcode,
            action: action_name(opcode),
            params: ActionParams::decode(opcode, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v4_sdk::v4_pool_key::tests::sample_key;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[test]
    fn test_action_table_matches_opcodes() {
        for (index, (action, _)) in ACTION_TABLE.iter().enumerate() {
            assert_eq!(*action as usize, index);
        }
        assert_eq!(ActionType::try_from(0x06).unwrap().name(), "CL_SWAP_EXACT_IN_SINGLE");
        assert_eq!(ActionType::try_from(0x0c).unwrap(), ActionType::SettleAll);
        assert_eq!(ActionType::try_from(0x0f).unwrap(), ActionType::TakeAll);
        assert_eq!(ActionType::try_from(0x20).unwrap().name(), "BIN_DONATE");
        assert_eq!(ActionType::try_from(0x21), Err(0x21));
        assert_eq!(action_name(0x42), "UNKNOWN_0x42");
    }

    #[test]
    fn test_swap_params_round_trip() {
        let params = ActionParams::ClSwapExactInSingle(ClSwapExactInSingleParams {
            pool_key: sample_key(),
            zero_for_one: true,
            amount_in: 10u128.pow(17),
            amount_out_minimum: 1,
            hook_data: Bytes::new(),
        });
        let encoded = params.encode().unwrap();
        // abi.encode of a dynamic struct starts with its offset
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32u64));
        assert_eq!(ActionParams::decode(0x06, &encoded), params);
    }

    #[test]
    fn test_settle_take_round_trip() {
        let settle = ActionParams::SettleAll(SettleAllParams {
            currency: Address::repeat_byte(1),
            max_amount: U256::from(5u64),
        });
        let take = ActionParams::TakeAll(TakeAllParams {
            currency: Address::repeat_byte(2),
            min_amount: U256::from(7u64),
        });
        let settle_bytes = settle.encode().unwrap();
        assert_eq!(settle_bytes.len(), 64);
        assert_eq!(ActionParams::decode(0x0c, &settle_bytes), settle);
        assert_eq!(ActionParams::decode(0x0f, &take.encode().unwrap()), take);
    }

    #[test]
    fn test_unknown_actions_pass_through() {
        let raw = vec![0xde, 0xad];
        assert_eq!(
            ActionParams::decode(0x30, &raw),
            ActionParams::Unknown(Bytes::from(raw.clone()))
        );
        // modelled action with a broken body degrades instead of failing
        assert_eq!(
            ActionParams::decode(0x0c, &raw),
            ActionParams::Unknown(Bytes::from(raw.clone()))
        );
        // known but unmodelled action
        let data = ActionData::decode(0x07, &raw);
        assert_eq!(data.action, "CL_SWAP_EXACT_IN");
        assert_eq!(data.params, ActionParams::Unknown(Bytes::from(raw)));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_pass_through_actions_are_logged() {
        let logs = captured_logs(|| {
            ActionParams::decode(0x07, &[0x01]);
        });
        assert!(logs.contains("WARN"));
        assert!(logs.contains("CL_SWAP_EXACT_IN"));

        let logs = captured_logs(|| {
            ActionParams::decode(0x30, &[0x01]);
        });
        assert!(logs.contains("unknown infinity action 0x30"));
    }

    #[test]
    fn test_settle_and_take_round_trip() {
        let settle = ActionParams::Settle(SettleParams {
            currency: Address::repeat_byte(3),
            amount: U256::from(1_000u64),
            payer_is_user: false,
        });
        let encoded = settle.encode().unwrap();
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[95], 0);
        assert_eq!(ActionParams::decode(0x0b, &encoded), settle);

        let take = ActionParams::Take(TakeParams {
            currency: Address::repeat_byte(4),
            recipient: Address::with_last_byte(2),
            amount: OPEN_DELTA,
        });
        let encoded = take.encode().unwrap();
        assert_eq!(&encoded[44..64], Address::with_last_byte(2).as_slice());
        assert_eq!(ActionParams::decode(0x0e, &encoded), take);
    }
}
