//! Chain connection settings shared by the HTTP client and the token service.

use crate::{Error, Result};

/// Configuration for talking to an EVM chain.
///
/// The gas limit is fixed and applied to every token transfer; there is no
/// gas estimation or nonce management in this layer.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Chain ID used when signing transactions
    pub chain_id: u64,
    /// Gas limit applied to token transfers
    pub gas_limit: u64,
    /// Interval between Transfer-log polls, in seconds
    pub poll_interval_secs: u64,
}

impl ChainConfig {
    /// Creates a configuration pointing at the given RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id: 1,
            gas_limit: 100_000,
            poll_interval_secs: 5,
        }
    }

    /// Sets the chain ID.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the fixed gas limit for token transfers.
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the Transfer-log polling interval.
    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.rpc_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}
