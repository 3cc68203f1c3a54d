use alloy::primitives::{address, Address};

use super::chain::ChainId;
use crate::v2_sdk::uniswapv2_pool::{UNISWAP_V2_POOL_FEE, V2_POOL_FEE};

/// Deployed periphery contracts the router toolkit talks to on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBook {
    pub universal_router: Address,
    pub permit2: Address,
    pub v3_quoter: Address,
    /// Infinity concentrated-liquidity pool manager, absent where Infinity is not deployed.
    pub cl_pool_manager: Option<Address>,
    /// flat fee of the chain's V2 pairs, hundredths of a bip
    pub v2_pool_fee: u32,
}

impl AddressBook {
    pub fn for_chain(chain_id: ChainId) -> Option<Self> {
        match chain_id {
            // PancakeSwap
            ChainId::Bnb => Some(AddressBook {
                universal_router: address!("d9C500DfF816a1Da21A48A732d3498Bf09dc9AEB"),
                permit2: address!("31c2F6fcFf4F8759b3Bd5Bf0e1084A055615c768"),
                v3_quoter: address!("B048Bbc1Ee6b733FFfCFb9e9CeF7375518e25997"),
                cl_pool_manager: Some(address!("a0FfB9c1CE1Fe56963B0321B32E7A0302114058b")),
                v2_pool_fee: V2_POOL_FEE,
            }),
            // Uniswap
            ChainId::Mainnet => Some(AddressBook {
                universal_router: address!("3fC91A3afd70395Cd496C647d5a6CC9D4B2b7FAD"),
                permit2: address!("000000000022D473030F116dDEE9F6B43aC78BA3"),
                v3_quoter: address!("61fFE014bA17989E743c5F6cB21bF9697530B21e"),
                cl_pool_manager: None,
                v2_pool_fee: UNISWAP_V2_POOL_FEE,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_book_lookup() {
        let bsc = AddressBook::for_chain(ChainId::Bnb).unwrap();
        assert!(bsc.cl_pool_manager.is_some());
        assert_eq!(bsc.v2_pool_fee, 2500);
        assert_eq!(AddressBook::for_chain(ChainId::Mainnet).unwrap().v2_pool_fee, 3000);
        assert!(AddressBook::for_chain(ChainId::Base).is_none());
    }
}
