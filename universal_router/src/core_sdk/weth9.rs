use alloy::primitives::{address, Address};

use super::chain::ChainId;

/// Canonical wrapped-native token of a chain (WETH, WBNB, ...).
///
/// Swap builders treat this address as the "pay / receive native currency" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weth9 {
    pub address: Address,
    pub decimals: u8,
    pub symbol: &'static str,
    pub name: &'static str,
}

impl From<ChainId> for Weth9 {
    fn from(chain_id: ChainId) -> Self {
        let (address, symbol, name) = match chain_id {
            ChainId::Mainnet => (
                address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                "WETH",
                "Wrapped Ether",
            ),
            ChainId::Bnb => (
                address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
                "WBNB",
                "Wrapped BNB",
            ),
            ChainId::BnbTestnet => (
                address!("ae13d989daC2f0dEbFf460aC112a837C89BAa7cd"),
                "WBNB",
                "Wrapped BNB",
            ),
            ChainId::Base => (
                address!("4200000000000000000000000000000000000006"),
                "WETH",
                "Wrapped Ether",
            ),
            ChainId::ArbitrumOne => (
                address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                "WETH",
                "Wrapped Ether",
            ),
        };
        Weth9 {
            address,
            decimals: 18,
            symbol,
            name,
        }
    }
}
