//! The tracked token record and its persisted form.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A tracked ERC-20 token.
///
/// A token starts life as a stub with only the contract address set and is
/// enriched asynchronously with its on-chain name, balance and decimals.
/// The address is the unique key and never changes once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Contract address (unique key)
    pub address: Address,
    /// Token name, fetched from the contract
    pub name: Option<String>,
    /// Balance of the active account, in the token's smallest unit
    pub balance: Option<U256>,
    /// Decimal places, fetched from the contract
    pub decimals: Option<u8>,
}

impl Token {
    /// Creates a stub token with only the address set.
    pub fn stub(address: Address) -> Self {
        Self {
            address,
            name: None,
            balance: None,
            decimals: None,
        }
    }
}

/// The persisted form of a token: address only.
///
/// Name, balance and decimals are deliberately not persisted; they are
/// refetched from the chain when the list is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedToken {
    /// Contract address
    pub address: Address,
}

impl From<&Token> for PersistedToken {
    fn from(token: &Token) -> Self {
        Self {
            address: token.address,
        }
    }
}

impl From<PersistedToken> for Token {
    fn from(persisted: PersistedToken) -> Self {
        Token::stub(persisted.address)
    }
}
