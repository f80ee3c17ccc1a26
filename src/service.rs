//! Token service: orchestrates chain reads, the reactive token list, the
//! persisted mirror and per-token transfer watchers.

use crate::chain::{ChainClient, KeyProvider};
use crate::storage::{KeyValueStore, TOKEN_STORAGE_KEY};
use crate::store::TokenStore;
use crate::{PersistedToken, Result, Token};

use alloy::primitives::{Address, B256, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One transfer watcher per token address. Replaced or cleared handles are
/// aborted.
#[derive(Clone, Default)]
struct WatcherSet {
    inner: Arc<Mutex<HashMap<Address, JoinHandle<()>>>>,
}

impl WatcherSet {
    fn contains(&self, address: Address) -> bool {
        self.inner
            .lock()
            .expect("watcher lock poisoned")
            .contains_key(&address)
    }

    fn insert(&self, address: Address, handle: JoinHandle<()>) {
        let replaced = self
            .inner
            .lock()
            .expect("watcher lock poisoned")
            .insert(address, handle);
        if let Some(old) = replaced {
            old.abort();
        }
    }

    fn abort_all(&self) {
        let mut watchers = self.inner.lock().expect("watcher lock poisoned");
        for (_, handle) in watchers.drain() {
            handle.abort();
        }
    }
}

/// Tracks a user's ERC-20 tokens.
///
/// The service owns the reactive token list, mirrors its addresses into the
/// given storage under [`TOKEN_STORAGE_KEY`], enriches tokens with their
/// on-chain name, decimals and balance, and refreshes balances whenever a
/// `Transfer` event is observed on a tracked contract.
///
/// Collaborators are injected explicitly; the service takes no global state.
/// Construction must happen inside a Tokio runtime because loading the
/// persisted list spawns fire-and-forget enrichment tasks.
pub struct TokenService {
    chain: Arc<dyn ChainClient>,
    keys: Arc<dyn KeyProvider>,
    storage: Arc<dyn KeyValueStore>,
    store: TokenStore,
    watchers: WatcherSet,
}

impl TokenService {
    /// Creates the service and restores the persisted token list.
    ///
    /// Restored tokens appear immediately as address-only stubs and are
    /// enriched asynchronously. A corrupt persisted blob is logged, the
    /// storage key is cleared and the service starts empty.
    pub fn new(
        chain: Arc<dyn ChainClient>,
        keys: Arc<dyn KeyProvider>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let service = Self {
            chain,
            keys,
            storage,
            store: TokenStore::new(),
            watchers: WatcherSet::default(),
        };
        service.load();
        service
    }

    /// Subscribes to the token list. The receiver immediately holds the
    /// current snapshot and is notified on every change.
    pub fn tokens(&self) -> watch::Receiver<Vec<Token>> {
        self.store.subscribe()
    }

    /// Returns a snapshot of the current token list.
    pub fn snapshot(&self) -> Vec<Token> {
        self.store.snapshot()
    }

    /// Appends a token to the list, republishes the stream and persists the
    /// address mirror.
    ///
    /// No duplicate check is performed; callers must ensure uniqueness.
    pub fn add_token(&self, token: Token) -> Result<()> {
        self.store.push(token);
        self.persist()
    }

    /// Returns true if a token with the given address is tracked.
    pub fn has_token_with_address(&self, address: Address) -> bool {
        self.store.contains(address)
    }

    /// Returns the tracked token with the given address.
    ///
    /// On a miss a stub is inserted and returned immediately while
    /// enrichment runs in the background, so the caller may observe a token
    /// with empty name and balance.
    pub fn token_by_address(&self, address: Address) -> Token {
        if let Some(token) = self.store.get(address) {
            return token;
        }
        let stub = Token::stub(address);
        self.store.push(stub.clone());
        self.spawn_enrichment(address);
        stub
    }

    /// Returns the token balance of `account`, defaulting to the active
    /// account supplied by the key provider.
    pub async fn balance_of(&self, token: Address, account: Option<Address>) -> Result<U256> {
        let account = account.unwrap_or_else(|| self.keys.address());
        self.chain.balance_of(token, account).await
    }

    /// Returns the token name.
    pub async fn token_name(&self, token: Address) -> Result<String> {
        self.chain.name(token).await
    }

    /// Heuristic ERC-20 check: true only if `totalSupply()` resolves to a
    /// positive value.
    ///
    /// Any failure yields `false`, so a network error is indistinguishable
    /// from "not a token" at this level. The underlying cause is logged at
    /// debug level.
    pub async fn is_valid_erc20(&self, address: Address) -> bool {
        match self.chain.total_supply(address).await {
            Ok(supply) => supply > U256::ZERO,
            Err(e) => {
                tracing::debug!(token = %address, "totalSupply probe failed: {e}");
                false
            }
        }
    }

    /// Transfers `amount` of `token` to `to`, signing with `signing_key`.
    ///
    /// Signing and broadcast are delegated to the chain client with the
    /// configured fixed gas limit; returns the receipt status.
    pub async fn transfer(
        &self,
        token: Address,
        signing_key: &B256,
        to: Address,
        amount: U256,
    ) -> Result<bool> {
        self.chain.transfer(token, signing_key, to, amount).await
    }

    /// Re-fetches the token's name and decimals (if absent) and its balance,
    /// updating the stored record only when something changed.
    pub async fn refresh_token(&self, address: Address) {
        refresh(&self.chain, &self.keys, &self.store, address).await;
    }

    /// Clears the token list, aborts all transfer watchers and persists the
    /// empty state.
    pub fn reset(&self) -> Result<()> {
        self.watchers.abort_all();
        self.store.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let addresses: Vec<PersistedToken> =
            self.store.snapshot().iter().map(PersistedToken::from).collect();
        let blob = serde_json::to_string(&addresses)?;
        self.storage.set(TOKEN_STORAGE_KEY, &blob)
    }

    fn load(&self) {
        let raw = match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("failed to read persisted token list: {e}");
                return;
            }
        };

        match serde_json::from_str::<Vec<PersistedToken>>(&raw) {
            Ok(persisted) => {
                for entry in persisted {
                    let address = entry.address;
                    self.store.push(entry.into());
                    self.spawn_enrichment(address);
                }
            }
            Err(e) => {
                tracing::warn!("discarding corrupt persisted token list: {e}");
                if let Err(e) = self.storage.remove(TOKEN_STORAGE_KEY) {
                    tracing::warn!("failed to clear corrupt token list: {e}");
                }
            }
        }
    }

    fn spawn_enrichment(&self, address: Address) {
        let chain = Arc::clone(&self.chain);
        let keys = Arc::clone(&self.keys);
        let store = self.store.clone();
        let watchers = self.watchers.clone();
        tokio::spawn(async move {
            refresh(&chain, &keys, &store, address).await;
            attach_watcher(chain, keys, store, watchers, address).await;
        });
    }
}

impl Drop for TokenService {
    fn drop(&mut self) {
        self.watchers.abort_all();
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("tokens", &self.store.len())
            .finish()
    }
}

/// Fetches fresh values outside the store lock, then applies them in one
/// atomic read-modify-write. Name and decimals are fetched only when absent.
async fn refresh(
    chain: &Arc<dyn ChainClient>,
    keys: &Arc<dyn KeyProvider>,
    store: &TokenStore,
    address: Address,
) {
    let Some(current) = store.get(address) else {
        return;
    };

    let name = if current.name.is_none() {
        match chain.name(address).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!(token = %address, "name fetch failed: {e}");
                None
            }
        }
    } else {
        None
    };

    let decimals = if current.decimals.is_none() {
        match chain.decimals(address).await {
            Ok(decimals) => Some(decimals),
            Err(e) => {
                tracing::debug!(token = %address, "decimals fetch failed: {e}");
                None
            }
        }
    } else {
        None
    };

    let balance = match chain.balance_of(address, keys.address()).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            tracing::debug!(token = %address, "balance fetch failed: {e}");
            None
        }
    };

    store.update(address, |token| {
        if let Some(name) = name {
            token.name = Some(name);
        }
        if let Some(decimals) = decimals {
            token.decimals = Some(decimals);
        }
        if let Some(balance) = balance {
            token.balance = Some(balance);
        }
    });
}

/// Subscribes to the contract's Transfer feed and refreshes the balance on
/// every event, regardless of which accounts the event involves. One watcher
/// per token.
async fn attach_watcher(
    chain: Arc<dyn ChainClient>,
    keys: Arc<dyn KeyProvider>,
    store: TokenStore,
    watchers: WatcherSet,
    address: Address,
) {
    if watchers.contains(address) {
        return;
    }

    let mut events = match chain.watch_transfers(address).await {
        Ok(events) => events,
        Err(e) => {
            tracing::debug!(token = %address, "transfer watch failed: {e}");
            return;
        }
    };

    // The list may have been reset while the feed was being set up; dropping
    // the receiver here ends the feed
    if !store.contains(address) {
        return;
    }

    let handle = tokio::spawn(async move {
        while events.recv().await.is_some() {
            refresh(&chain, &keys, &store, address).await;
        }
    });
    watchers.insert(address, handle);
}
