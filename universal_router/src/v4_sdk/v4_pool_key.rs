use alloy::{
    primitives::{aliases::U24, Address, Bytes, B256},
    sol,
    sol_types::{SolCall, SolType},
};
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use crate::universal_router_sdk::{
    universal_router_client::ContractCaller, universal_router_commands::UniversalRouterError,
};

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    struct PoolKey {
        address currency0;
        address currency1;
        address hooks;
        address poolManager;
        uint24 fee;
        bytes32 parameters;
    }

    #[allow(missing_docs)]
    function poolIdToPoolKey(bytes32 id)
        external
        view
        returns (address currency0, address currency1, address hooks, address poolManager, uint24 fee, bytes32 parameters);
}

const MAX_FEE: u32 = 0x00ff_ffff;

/// Infinity (V4) pool identity inside a shared pool manager. `parameters` packs
/// tick spacing and hook flags and is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKeyV4 {
    pub currency0: Address,
    pub currency1: Address,
    pub hooks: Address,
    pub pool_manager: Address,
    pub fee: u32,
    pub parameters: B256,
}

impl PoolKeyV4 {
    pub fn contains(&self, currency: Address) -> bool {
        currency == self.currency0 || currency == self.currency1
    }

    pub fn to_sol(&self) -> Result<PoolKey, UniversalRouterError> {
        if self.fee > MAX_FEE {
            return Err(UniversalRouterError::InvalidPoolKey(format!(
                "fee {} overflows uint24",
                self.fee
            )));
        }
        Ok(PoolKey {
            currency0: self.currency0,
            currency1: self.currency1,
            hooks: self.hooks,
            poolManager: self.pool_manager,
            fee: U24::from(self.fee),
            parameters: self.parameters,
        })
    }

    /// `keccak256(abi.encode(poolKey))`
    pub fn pool_id(&self) -> Result<B256, UniversalRouterError> {
        let encoded = <PoolKey as SolType>::abi_encode(&self.to_sol()?);
        let mut hasher = Keccak::v256();
        hasher.update(&encoded);
        let mut id = [0u8; 32];
        hasher.finalize(&mut id);
        Ok(B256::from(id))
    }
}

impl From<PoolKey> for PoolKeyV4 {
    fn from(key: PoolKey) -> Self {
        Self {
            currency0: key.currency0,
            currency1: key.currency1,
            hooks: key.hooks,
            pool_manager: key.poolManager,
            fee: key.fee.to::<u32>(),
            parameters: key.parameters,
        }
    }
}

/// Looks a key up by id on the CL pool manager.
pub async fn resolve_pool_key<C: ContractCaller + ?Sized>(
    caller: &C,
    pool_manager: Address,
    pool_id: B256,
) -> Result<PoolKeyV4, UniversalRouterError> {
    let calldata = poolIdToPoolKeyCall { id: pool_id }.abi_encode();
    let output = caller.call(pool_manager, Bytes::from(calldata)).await?;
    let key = poolIdToPoolKeyCall::abi_decode_returns(&output, true)
        .map_err(|e| UniversalRouterError::AbiDecode(e.to_string()))?;
    if key.currency0.is_zero() && key.currency1.is_zero() && key.poolManager.is_zero() {
        return Err(UniversalRouterError::InvalidPoolKey(format!(
            "pool {pool_id} is not initialized"
        )));
    }
    Ok(PoolKeyV4 {
        currency0: key.currency0,
        currency1: key.currency1,
        hooks: key.hooks,
        pool_manager: key.poolManager,
        fee: key.fee.to::<u32>(),
        parameters: key.parameters,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::universal_router_sdk::universal_router_client::mock::MockTransport;
    use alloy::primitives::{b256, keccak256};

    pub(crate) fn sample_key() -> PoolKeyV4 {
        PoolKeyV4 {
            currency0: Address::repeat_byte(0x11),
            currency1: Address::repeat_byte(0x22),
            hooks: Address::ZERO,
            pool_manager: Address::repeat_byte(0xcc),
            fee: 2500,
            parameters: b256!("00000000000000000000000000000000000000000000000000000000000a0000"),
        }
    }

    #[test]
    fn test_pool_id_is_keccak_of_static_encoding() {
        let key = sample_key();
        let encoded = <PoolKey as SolType>::abi_encode(&key.to_sol().unwrap());
        assert_eq!(encoded.len(), 192);
        assert_eq!(key.pool_id().unwrap(), keccak256(&encoded));

        let mut other = key;
        other.fee = 500;
        assert_ne!(other.pool_id().unwrap(), key.pool_id().unwrap());
    }

    #[test]
    fn test_fee_overflow_is_rejected() {
        let mut key = sample_key();
        key.fee = 0x0100_0000;
        assert!(matches!(
            key.pool_id(),
            Err(UniversalRouterError::InvalidPoolKey(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_pool_key() {
        let key = sample_key();
        let pool_id = key.pool_id().unwrap();
        let output = poolIdToPoolKeyCall::abi_encode_returns(&(
            key.currency0,
            key.currency1,
            key.hooks,
            key.pool_manager,
            U24::from(key.fee),
            key.parameters,
        ));
        let transport = MockTransport::new(Address::ZERO).respond(
            key.pool_manager,
            poolIdToPoolKeyCall::SELECTOR,
            output,
        );
        let resolved = resolve_pool_key(&transport, key.pool_manager, pool_id)
            .await
            .unwrap();
        assert_eq!(resolved, key);
        assert_eq!(resolved.pool_id().unwrap(), pool_id);
    }

    #[tokio::test]
    async fn test_resolve_unknown_pool() {
        let manager = Address::repeat_byte(0xcc);
        let output = poolIdToPoolKeyCall::abi_encode_returns(&(
            Address::ZERO,
            Address::ZERO,
            Address::ZERO,
            Address::ZERO,
            U24::ZERO,
            B256::ZERO,
        ));
        let transport =
            MockTransport::new(Address::ZERO).respond(manager, poolIdToPoolKeyCall::SELECTOR, output);
        assert!(resolve_pool_key(&transport, manager, B256::ZERO).await.is_err());
    }
}
