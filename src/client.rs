//! Alloy-backed [`ChainClient`] implementation over HTTP JSON-RPC.

use crate::chain::{ChainClient, TransferEvent, ERC20};
use crate::{ChainConfig, Error, Result};

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

/// ERC-20 client over an HTTP JSON-RPC provider.
///
/// Transfer events are observed by polling `eth_getLogs` at the configured
/// interval; there is no websocket subscription in this layer.
#[derive(Debug, Clone)]
pub struct HttpChainClient {
    config: ChainConfig,
}

impl HttpChainClient {
    /// Creates a client for the given chain configuration.
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the chain configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn provider(&self) -> Result<impl Provider> {
        let url = self
            .config
            .rpc_url
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{e}")))?;
        Ok(ProviderBuilder::new().connect_http(url))
    }

    async fn call_contract<C: SolCall>(&self, token: Address, call: C) -> Result<C::Return> {
        let provider = self.provider()?;
        let tx = TransactionRequest::default()
            .to(token)
            .input(call.abi_encode().into());

        let result = provider
            .call(tx)
            .await
            .map_err(|e| Error::Contract(format!("{e}")))?;

        C::abi_decode_returns(&result).map_err(|e| Error::Contract(format!("Decode error: {e}")))
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        self.call_contract(token, ERC20::balanceOfCall { account }).await
    }

    async fn name(&self, token: Address) -> Result<String> {
        self.call_contract(token, ERC20::nameCall {}).await
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        self.call_contract(token, ERC20::decimalsCall {}).await
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        self.call_contract(token, ERC20::totalSupplyCall {}).await
    }

    async fn transfer(
        &self,
        token: Address,
        signing_key: &B256,
        to: Address,
        amount: U256,
    ) -> Result<bool> {
        let signer = PrivateKeySigner::from_slice(signing_key.as_slice())
            .map_err(|e| Error::Signing(format!("{e}")))?;

        let url = self
            .config
            .rpc_url
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{e}")))?;
        let provider = ProviderBuilder::new()
            .wallet(alloy::network::EthereumWallet::from(signer))
            .connect_http(url);

        let call = ERC20::transferCall { to, amount };
        let tx = TransactionRequest::default()
            .with_to(token)
            .with_input(Bytes::from(call.abi_encode()))
            .with_gas_limit(self.config.gas_limit)
            .with_chain_id(self.config.chain_id);

        let pending_tx = provider
            .send_transaction(tx)
            .await
            .map_err(|e| Error::TxResponse(format!("Failed to send transaction: {e}")))?;

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| Error::TxResponse(format!("Failed to get receipt: {e}")))?;

        Ok(receipt.status())
    }

    async fn watch_transfers(&self, token: Address) -> Result<mpsc::Receiver<TransferEvent>> {
        let provider = self.provider()?;
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs);
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut from_block = match provider.get_block_number().await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(token = %token, "transfer watcher failed to start: {e}");
                    return;
                }
            };

            loop {
                tokio::time::sleep(poll_interval).await;

                let filter = Filter::new()
                    .address(token)
                    .event_signature(ERC20::Transfer::SIGNATURE_HASH)
                    .from_block(from_block);

                let logs = match provider.get_logs(&filter).await {
                    Ok(logs) => logs,
                    Err(e) => {
                        tracing::debug!(token = %token, "transfer log poll failed: {e}");
                        continue;
                    }
                };

                for log in logs {
                    if let Some(block) = log.block_number {
                        from_block = from_block.max(block + 1);
                    }
                    let event = TransferEvent {
                        token,
                        block_number: log.block_number,
                        tx_hash: log.transaction_hash,
                    };
                    if tx.send(event).await.is_err() {
                        // Receiver gone, stop polling
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    #[test]
    fn test_client_rejects_invalid_url() {
        let result = HttpChainClient::new(ChainConfig::new("not-a-valid-url"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_rpc_error() {
        let client = HttpChainClient::new(ChainConfig::new("http://127.0.0.1:59999")).unwrap();
        let result = client.total_supply(USDC).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transfer_rejects_zero_key() {
        // An all-zero scalar is not a valid secp256k1 key
        let client = HttpChainClient::new(ChainConfig::default()).unwrap();
        let result = client
            .transfer(USDC, &B256::ZERO, Address::ZERO, U256::from(1u64))
            .await;
        assert!(matches!(result, Err(Error::Signing(_))));
    }
}

// ============================================================================
// Integration tests (require network access)
// ============================================================================
