//! # tokend
//!
//! Tracks a user's ERC-20 tokens: a reactive token list enriched with
//! on-chain name, decimals and balance, a persisted address mirror, token
//! transfers, and an access gate for wizard-style setup steps.
//!
//! This library uses the [alloy](https://github.com/alloy-rs/alloy) framework
//! for Ethereum interactions. Collaborators (chain client, key provider,
//! storage) are traits injected through the [`TokenService`] constructor, so
//! every piece can be replaced or mocked.
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokend::prelude::*;
//!
//! # async fn tokens() -> Result<(), tokend::Error> {
//! let config = ChainConfig::new("https://eth.llamarpc.com").with_chain_id(1);
//! let chain = Arc::new(HttpChainClient::new(config)?);
//! let account: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
//! let keys = Arc::new(StaticKeyProvider(account));
//! let storage = Arc::new(FileStore::new("./state"));
//!
//! let service = TokenService::new(chain, keys, storage);
//!
//! let usdc: Address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse().unwrap();
//! if service.is_valid_erc20(usdc).await {
//!     service.add_token(Token::stub(usdc))?;
//! }
//! let balance = service.balance_of(usdc, None).await?;
//! println!("USDC balance: {balance}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Subscribing to the token list
//!
//! The token list is a latest-value, multicast stream: a new subscriber
//! immediately observes the current snapshot and is notified on every
//! change.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use tokend::prelude::*;
//! # async fn watch(service: &TokenService) {
//! let mut tokens = service.tokens();
//! while tokens.changed().await.is_ok() {
//!     for token in tokens.borrow().iter() {
//!         println!("{}: {:?}", token.address, token.balance);
//!     }
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub use error::{Error, Result};

mod config;
pub use config::ChainConfig;

mod token;
pub use token::{PersistedToken, Token};

mod store;
pub use store::TokenStore;

pub mod chain;
pub use chain::{ChainClient, KeyProvider, StaticKeyProvider, TransferEvent};

mod client;
pub use client::HttpChainClient;

pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore, TOKEN_STORAGE_KEY};

mod service;
pub use service::TokenService;

mod gate;
pub use gate::{Navigator, SetupGate, StepValidator, PART_ONE_ROUTE};

pub use alloy;

pub mod prelude;
