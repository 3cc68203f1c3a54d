use std::str::FromStr;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, Log, B256, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

/// Router `execute` call ready to be signed and sent.
#[derive(Debug, Clone, Default)]
pub struct ExecuteTransaction {
    pub to: Address,
    pub input: Bytes,
    pub value: U256,
    pub gas_limit: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// The parts of a mined receipt the swap extraction reads.
#[derive(Debug, Clone, Default)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub gas_used: U256,
    pub effective_gas_price: U256,
    pub logs: Vec<Log>,
}

/// Read-only `eth_call` access.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes>;
}

/// Signs, submits and waits for a transaction. Nonce handling belongs to the implementor.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    fn sender(&self) -> Address;

    async fn send_and_confirm(&self, tx: ExecuteTransaction) -> Result<TxReceipt>;
}

pub struct AlloyTransport<P> {
    provider: P,
    sender: Address,
}

impl<P> AlloyTransport<P> {
    pub fn new(provider: P, sender: Address) -> Self {
        Self { provider, sender }
    }
}

/// HTTP provider with the recommended fillers and a local private key wallet.
pub fn connect_http(
    rpc_url: &str,
    private_key: &str,
) -> Result<AlloyTransport<impl Provider<Http<Client>> + Clone>> {
    let signer = PrivateKeySigner::from_str(private_key.trim_start_matches("0x"))
        .context("invalid private key")?;
    let sender = signer.address();
    let url = rpc_url
        .parse()
        .with_context(|| format!("invalid rpc url {rpc_url}"))?;
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);
    Ok(AlloyTransport::new(provider, sender))
}

#[async_trait]
impl<P> ContractCaller for AlloyTransport<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        let output = self
            .provider
            .call(&tx)
            .await
            .with_context(|| format!("eth_call to {to} failed"))?;
        Ok(output)
    }
}

#[async_trait]
impl<P> TransactionSender for AlloyTransport<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    fn sender(&self) -> Address {
        self.sender
    }

    async fn send_and_confirm(&self, tx: ExecuteTransaction) -> Result<TxReceipt> {
        let mut request = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(tx.to)
            .with_input(tx.input)
            .with_value(tx.value);
        if let Some(gas_limit) = tx.gas_limit {
            request = request.with_gas_limit(gas_limit);
        }
        if let Some(max_fee_per_gas) = tx.max_fee_per_gas {
            request = request.with_max_fee_per_gas(max_fee_per_gas);
        }
        if let Some(max_priority_fee_per_gas) = tx.max_priority_fee_per_gas {
            request = request.with_max_priority_fee_per_gas(max_priority_fee_per_gas);
        }

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .context("failed to submit router transaction")?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "router transaction submitted");

        let receipt = pending
            .get_receipt()
            .await
            .with_context(|| format!("failed to confirm transaction {tx_hash}"))?;
        if !receipt.status() {
            bail!("transaction {tx_hash} reverted");
        }
        debug!(%tx_hash, gas_used = %receipt.gas_used, "router transaction confirmed");

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default(),
            gas_used: U256::from(receipt.gas_used),
            effective_gas_price: U256::from(receipt.effective_gas_price),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        })
    }
}
