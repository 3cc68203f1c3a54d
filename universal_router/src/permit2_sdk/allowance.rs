// https://github.com/Uniswap/permit2/blob/main/src/AllowanceTransfer.sol
use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use anyhow::{Context, Result};

use crate::universal_router_sdk::universal_router_client::ContractCaller;

sol! {
    #[allow(missing_docs)]
    function allowance(address owner, address token, address spender)
        external
        view
        returns (uint160 amount, uint48 expiration, uint48 nonce);
}

/// Permit2 allowance of `(owner, token, spender)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowanceInfo {
    pub amount: U256,
    /// unix seconds; 0 never expires for allowances set through `approve`
    pub expiration: u64,
    pub nonce: u64,
}

impl AllowanceInfo {
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration != 0 && self.expiration < now
    }

    pub fn covers(&self, amount: U256, now: u64) -> bool {
        !self.is_expired(now) && self.amount >= amount
    }
}

pub async fn read_allowance<C: ContractCaller + ?Sized>(
    caller: &C,
    permit2: Address,
    owner: Address,
    token: Address,
    spender: Address,
) -> Result<AllowanceInfo> {
    let calldata = allowanceCall {
        owner,
        token,
        spender,
    }
    .abi_encode();
    let output = caller.call(permit2, Bytes::from(calldata)).await?;
    let decoded = allowanceCall::abi_decode_returns(&output, true)
        .with_context(|| format!("cannot decode permit2 allowance of {token}"))?;
    Ok(AllowanceInfo {
        amount: U256::from(decoded.amount),
        expiration: decoded.expiration.to::<u64>(),
        nonce: decoded.nonce.to::<u64>(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::universal_router_sdk::universal_router_client::mock::MockTransport;
    use alloy::primitives::{aliases::U48, U160};

    pub(crate) fn allowance_output(amount: u64, expiration: u64) -> Vec<u8> {
        allowanceCall::abi_encode_returns(&(
            U160::from(amount),
            U48::from(expiration),
            U48::from(3u64),
        ))
    }

    #[test]
    fn test_allowance_expiry() {
        let info = AllowanceInfo {
            amount: U256::from(100u64),
            expiration: 1_000,
            nonce: 0,
        };
        assert!(info.covers(U256::from(100u64), 999));
        assert!(!info.covers(U256::from(101u64), 999));
        assert!(!info.covers(U256::from(1u64), 1_001));
        let forever = AllowanceInfo {
            expiration: 0,
            ..info
        };
        assert!(forever.covers(U256::from(1u64), u64::MAX));
    }

    #[tokio::test]
    async fn test_read_allowance() {
        let permit2 = Address::repeat_byte(0x22);
        let transport = MockTransport::new(Address::ZERO).respond(
            permit2,
            allowanceCall::SELECTOR,
            allowance_output(500, 1_900_000_000),
        );
        let info = read_allowance(
            &transport,
            permit2,
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            Address::repeat_byte(3),
        )
        .await
        .unwrap();
        assert_eq!(
            info,
            AllowanceInfo {
                amount: U256::from(500u64),
                expiration: 1_900_000_000,
                nonce: 3
            }
        );
    }
}
