//! Chain-facing trait seams: the ERC-20 client and the active-key provider.

use crate::Result;
use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use async_trait::async_trait;
use tokio::sync::mpsc;

// Rust bindings for the ERC-20 interface used throughout the crate
sol! {
    contract ERC20 {
        function name() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);

        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

/// A `Transfer` event observed on a tracked token contract.
///
/// The feed is unfiltered: every transfer on the contract is reported, not
/// just those involving the active account. Consumers use the event as a
/// refresh trigger, so the participant fields are not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// The token contract the event was emitted on
    pub token: Address,
    /// Block the event was included in, if known
    pub block_number: Option<u64>,
    /// Hash of the transaction that emitted the event, if known
    pub tx_hash: Option<B256>,
}

/// Client for ERC-20 reads, transfers and event feeds on one chain.
///
/// Every RPC failure surfaces as an `Err`; this layer performs no retries
/// and no gas estimation or nonce management.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the token balance of `account`.
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    /// Returns the token name.
    async fn name(&self, token: Address) -> Result<String>;

    /// Returns the token's decimal places.
    async fn decimals(&self, token: Address) -> Result<u8>;

    /// Returns the token's total supply.
    async fn total_supply(&self, token: Address) -> Result<U256>;

    /// Encodes an ERC-20 `transfer`, signs it with `signing_key`, broadcasts
    /// it and returns the receipt status.
    async fn transfer(
        &self,
        token: Address,
        signing_key: &B256,
        to: Address,
        amount: U256,
    ) -> Result<bool>;

    /// Returns a feed of all `Transfer` events on the token contract.
    ///
    /// The feed ends when the sender side is dropped or the receiver is
    /// closed.
    async fn watch_transfers(&self, token: Address) -> Result<mpsc::Receiver<TransferEvent>>;
}

/// Supplies the active account address.
pub trait KeyProvider: Send + Sync {
    /// Returns the address of the active account.
    fn address(&self) -> Address;
}

/// A key provider backed by a fixed address.
#[derive(Debug, Clone, Copy)]
pub struct StaticKeyProvider(pub Address);

impl KeyProvider for StaticKeyProvider {
    fn address(&self) -> Address {
        self.0
    }
}

impl KeyProvider for alloy::signers::local::PrivateKeySigner {
    fn address(&self) -> Address {
        alloy::signers::Signer::address(self)
    }
}
