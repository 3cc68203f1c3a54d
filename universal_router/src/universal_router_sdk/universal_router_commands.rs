// https://developer.pancakeswap.finance/contracts/universal-router/overview
// https://bscscan.com/address/0xd9C500DfF816a1Da21A48A732d3498Bf09dc9AEB#code
use alloy::{
    primitives::{address, Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use derive_builder::Builder;

use crate::universal_router_sdk::swap_result::PoolVersion;
use crate::v3_sdk::{uniswapv3_path::V3PathError, uniswapv3_quoter::UniswapV3QuoterError};
use crate::v4_sdk::v4_planner::ActionPlan;

/// `ActionConstants.ADDRESS_THIS`, the router's own balance.
pub const ADDRESS_THIS: Address = address!("0000000000000000000000000000000000000002");

pub const FLAG_ALLOW_REVERT: u8 = 0x80;
pub const COMMAND_TYPE_MASK: u8 = 0x3f;

#[derive(thiserror::Error, Debug)]
pub enum UniversalRouterError {
    #[error("unsupported command 0x{0:02x}")]
    UnsupportCommand(u8),

    #[error("token {0} is not part of the pool")]
    TokenNotInPool(Address),

    #[error("slippage {0} bps is outside 0..=10000")]
    SlippageOutOfRange(u32),

    #[error("amount {0} does not fit in uint128")]
    AmountOverflow(U256),

    #[error("permit2 allowance of {token} is {available}, need {required}")]
    InsufficientAllowance {
        token: Address,
        required: U256,
        available: U256,
    },

    #[error("no matching {0} Swap log in receipt")]
    NoMatchingLog(PoolVersion),

    #[error("unexpected swap amount sign: {0}")]
    UnexpectedSign(String),

    #[error("invalid pool key: {0}")]
    InvalidPoolKey(String),

    #[error(transparent)]
    Path(#[from] V3PathError),

    #[error(transparent)]
    Quoter(#[from] UniswapV3QuoterError),

    #[error("abi decode failed: {0}")]
    AbiDecode(String),

    #[error("invalid router payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Top-level router opcodes. The command byte carries the allow-revert flag in bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    V3SwapExactIn = 0x00,
    V3SwapExactOut = 0x01,
    Permit2TransferFrom = 0x02,
    Permit2PermitBatch = 0x03,
    Sweep = 0x04,
    Transfer = 0x05,
    PayPortion = 0x06,
    V2SwapExactIn = 0x08,
    V2SwapExactOut = 0x09,
    Permit2Permit = 0x0a,
    WrapEth = 0x0b,
    UnwrapWeth = 0x0c,
    Permit2TransferFromBatch = 0x0d,
    BalanceCheckErc20 = 0x0e,
    InfiSwap = 0x10,
    V3PositionManagerPermit = 0x11,
    V3PositionManagerCall = 0x12,
    InfiClInitializePool = 0x13,
    InfiBinInitializePool = 0x14,
    InfiClPositionCall = 0x15,
    InfiBinPositionCall = 0x16,
    ExecuteSubPlan = 0x21,
    StableSwapExactIn = 0x22,
    StableSwapExactOut = 0x23,
}

impl CommandType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::V3SwapExactIn => "V3_SWAP_EXACT_IN",
            Self::V3SwapExactOut => "V3_SWAP_EXACT_OUT",
            Self::Permit2TransferFrom => "PERMIT2_TRANSFER_FROM",
            Self::Permit2PermitBatch => "PERMIT2_PERMIT_BATCH",
            Self::Sweep => "SWEEP",
            Self::Transfer => "TRANSFER",
            Self::PayPortion => "PAY_PORTION",
            Self::V2SwapExactIn => "V2_SWAP_EXACT_IN",
            Self::V2SwapExactOut => "V2_SWAP_EXACT_OUT",
            Self::Permit2Permit => "PERMIT2_PERMIT",
            Self::WrapEth => "WRAP_ETH",
            Self::UnwrapWeth => "UNWRAP_WETH",
            Self::Permit2TransferFromBatch => "PERMIT2_TRANSFER_FROM_BATCH",
            Self::BalanceCheckErc20 => "BALANCE_CHECK_ERC20",
            Self::InfiSwap => "INFI_SWAP",
            Self::V3PositionManagerPermit => "V3_POSITION_MANAGER_PERMIT",
            Self::V3PositionManagerCall => "V3_POSITION_MANAGER_CALL",
            Self::InfiClInitializePool => "INFI_CL_INITIALIZE_POOL",
            Self::InfiBinInitializePool => "INFI_BIN_INITIALIZE_POOL",
            Self::InfiClPositionCall => "INFI_CL_POSITION_CALL",
            Self::InfiBinPositionCall => "INFI_BIN_POSITION_CALL",
            Self::ExecuteSubPlan => "EXECUTE_SUB_PLAN",
            Self::StableSwapExactIn => "STABLE_SWAP_EXACT_IN",
            Self::StableSwapExactOut => "STABLE_SWAP_EXACT_OUT",
        }
    }
}

impl TryFrom<u8> for CommandType {
    type Error = UniversalRouterError;

    fn try_from(value: u8) -> Result<Self, UniversalRouterError> {
        match value & COMMAND_TYPE_MASK {
            0x00 => Ok(Self::V3SwapExactIn),
            0x01 => Ok(Self::V3SwapExactOut),
            0x02 => Ok(Self::Permit2TransferFrom),
            0x03 => Ok(Self::Permit2PermitBatch),
            0x04 => Ok(Self::Sweep),
            0x05 => Ok(Self::Transfer),
            0x06 => Ok(Self::PayPortion),
            0x08 => Ok(Self::V2SwapExactIn),
            0x09 => Ok(Self::V2SwapExactOut),
            0x0a => Ok(Self::Permit2Permit),
            0x0b => Ok(Self::WrapEth),
            0x0c => Ok(Self::UnwrapWeth),
            0x0d => Ok(Self::Permit2TransferFromBatch),
            0x0e => Ok(Self::BalanceCheckErc20),
            0x10 => Ok(Self::InfiSwap),
            0x11 => Ok(Self::V3PositionManagerPermit),
            0x12 => Ok(Self::V3PositionManagerCall),
            0x13 => Ok(Self::InfiClInitializePool),
            0x14 => Ok(Self::InfiBinInitializePool),
            0x15 => Ok(Self::InfiClPositionCall),
            0x16 => Ok(Self::InfiBinPositionCall),
            0x21 => Ok(Self::ExecuteSubPlan),
            0x22 => Ok(Self::StableSwapExactIn),
            0x23 => Ok(Self::StableSwapExactOut),
            _ => Err(UniversalRouterError::UnsupportCommand(value)),
        }
    }
}

/// One router step with its typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniversalRouterCommand {
    V3SwapExactIn(V3SwapExactInParams),
    V2SwapExactIn(V2SwapExactInParams),
    WrapEth(WrapEthParams),
    UnwrapWeth(UnwrapWethParams),
    InfiSwap(ActionPlan),
    /// Any other opcode with an already encoded input.
    Raw { command: u8, input: Bytes },
}

impl UniversalRouterCommand {
    pub fn command_byte(&self) -> u8 {
        match self {
            Self::V3SwapExactIn(_) => CommandType::V3SwapExactIn as u8,
            Self::V2SwapExactIn(_) => CommandType::V2SwapExactIn as u8,
            Self::WrapEth(_) => CommandType::WrapEth as u8,
            Self::UnwrapWeth(_) => CommandType::UnwrapWeth as u8,
            Self::InfiSwap(_) => CommandType::InfiSwap as u8,
            Self::Raw { command, .. } => *command,
        }
    }

    pub fn encode_input(&self) -> Result<Bytes, UniversalRouterError> {
        Ok(match self {
            Self::V3SwapExactIn(params) => params.encode().into(),
            Self::V2SwapExactIn(params) => params.encode().into(),
            Self::WrapEth(params) => params.encode().into(),
            Self::UnwrapWeth(params) => params.encode().into(),
            Self::InfiSwap(plan) => plan.encode_swap_input()?,
            Self::Raw { input, .. } => input.clone(),
        })
    }

    /// Rebuilds a typed command from its command byte and input blob.
    pub fn decode(command: u8, input: &[u8]) -> Result<Self, UniversalRouterError> {
        if command & FLAG_ALLOW_REVERT != 0 {
            return Ok(Self::Raw {
                command,
                input: Bytes::copy_from_slice(input),
            });
        }
        Ok(match CommandType::try_from(command)? {
            CommandType::V3SwapExactIn => Self::V3SwapExactIn(V3SwapExactInParams::decode(input)?),
            CommandType::V2SwapExactIn => Self::V2SwapExactIn(V2SwapExactInParams::decode(input)?),
            CommandType::WrapEth => Self::WrapEth(WrapEthParams::decode(input)?),
            CommandType::UnwrapWeth => Self::UnwrapWeth(UnwrapWethParams::decode(input)?),
            CommandType::InfiSwap => Self::InfiSwap(ActionPlan::decode_swap_input(input)?),
            _ => Self::Raw {
                command,
                input: Bytes::copy_from_slice(input),
            },
        })
    }
}

fn abi_err(e: alloy::sol_types::Error) -> UniversalRouterError {
    UniversalRouterError::AbiDecode(e.to_string())
}

sol! {
    #[allow(missing_docs)]
    function v3SwapExactIn(address recipient, uint256 amountIn, uint256 amountOutMin, bytes calldata path, bool payerIsUser) external;

    #[allow(missing_docs)]
    function v2SwapExactIn(address recipient, uint256 amountIn, uint256 amountOutMin, address[] calldata path, bool payerIsUser) external;

    #[allow(missing_docs)]
    function wrapEth(address recipient, uint256 amount) external;

    #[allow(missing_docs)]
    function unwrapWeth(address recipient, uint256 amountMin) external;
}

#[derive(Builder, Default, Debug, Clone, PartialEq, Eq)]
pub struct V3SwapExactInParams {
    /// The recipient of the output of the trade
    pub recipient: Address,
    /// The amount of input tokens for the trade
    pub amount_in: U256,
    /// The minimum amount of output tokens the user wants
    pub min_amount_out: U256,
    /// The V3 encoded path to trade along
    pub path: Bytes,
    /// Whether the input comes from msg.sender through Permit2, or is already held by the router
    #[builder(default = "true")]
    pub payer_is_user: bool,
}

impl V3SwapExactInParams {
    pub fn encode(&self) -> Vec<u8> {
        let data = v3SwapExactInCall::new((
            self.recipient,
            self.amount_in,
            self.min_amount_out,
            self.path.clone(),
            self.payer_is_user,
        ));
        // trim the selector
        data.abi_encode()[4..].to_vec()
    }

    pub fn decode(data: &[u8]) -> Result<Self, UniversalRouterError> {
        let decoded = v3SwapExactInCall::abi_decode_raw(data, true).map_err(abi_err)?;
        Ok(Self {
            recipient: decoded.recipient,
            amount_in: decoded.amountIn,
            min_amount_out: decoded.amountOutMin,
            path: decoded.path,
            payer_is_user: decoded.payerIsUser,
        })
    }
}

#[derive(Debug, Clone, Default, Builder, PartialEq, Eq)]
pub struct V2SwapExactInParams {
    /// The recipient of the output of the trade
    #[builder(default = "ADDRESS_THIS")]
    pub recipient: Address,
    /// The amount of input tokens for the trade
    pub amount_in: U256,
    /// The minimum amount of output tokens the user wants
    pub min_amount_out: U256,
    /// The V2 token path to trade along
    pub path: Vec<Address>,
    #[builder(default = "true")]
    pub payer_is_user: bool,
}

impl V2SwapExactInParams {
    pub fn encode(&self) -> Vec<u8> {
        let data = v2SwapExactInCall::new((
            self.recipient,
            self.amount_in,
            self.min_amount_out,
            self.path.clone(),
            self.payer_is_user,
        ));
        data.abi_encode()[4..].to_vec()
    }

    pub fn decode(data: &[u8]) -> Result<Self, UniversalRouterError> {
        let decoded = v2SwapExactInCall::abi_decode_raw(data, true).map_err(abi_err)?;
        Ok(Self {
            recipient: decoded.recipient,
            amount_in: decoded.amountIn,
            min_amount_out: decoded.amountOutMin,
            path: decoded.path,
            payer_is_user: decoded.payerIsUser,
        })
    }
}

#[derive(Debug, Clone, Default, Builder, PartialEq, Eq)]
pub struct WrapEthParams {
    /// The recipient of the wrapped native token
    #[builder(default = "ADDRESS_THIS")]
    pub recipient: Address,
    /// The amount of native currency to wrap
    pub amount: U256,
}

impl WrapEthParams {
    pub fn encode(&self) -> Vec<u8> {
        wrapEthCall::new((self.recipient, self.amount)).abi_encode()[4..].to_vec()
    }

    pub fn decode(data: &[u8]) -> Result<Self, UniversalRouterError> {
        let decoded = wrapEthCall::abi_decode_raw(data, true).map_err(abi_err)?;
        Ok(Self {
            recipient: decoded.recipient,
            amount: decoded.amount,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwrapWethParams {
    /// The recipient of the native currency
    pub recipient: Address,
    /// The minimum required native currency to receive from the unwrapping
    pub min_amount_out: U256,
}

impl UnwrapWethParams {
    pub fn encode(&self) -> Vec<u8> {
        unwrapWethCall::new((self.recipient, self.min_amount_out)).abi_encode()[4..].to_vec()
    }

    pub fn decode(data: &[u8]) -> Result<Self, UniversalRouterError> {
        let decoded = unwrapWethCall::abi_decode_raw(data, true).map_err(abi_err)?;
        Ok(Self {
            recipient: decoded.recipient,
            min_amount_out: decoded.amountMin,
        })
    }
}
