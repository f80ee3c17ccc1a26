//! This prelude module simplifies importing many useful items from the
//! tokend crate using a glob import.
//!
//! To use this prelude, add the following to your code:
//! ```
//! use tokend::prelude::*;
//! ```

pub use crate::{
    ChainClient, ChainConfig, Error, FileStore, HttpChainClient, KeyProvider, KeyValueStore,
    MemoryStore, Navigator, PersistedToken, Result, SetupGate, StaticKeyProvider, StepValidator,
    Token, TokenService, TokenStore, TransferEvent, PART_ONE_ROUTE, TOKEN_STORAGE_KEY,
};

pub use alloy::primitives::{Address, B256, U256};
