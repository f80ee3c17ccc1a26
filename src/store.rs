//! Reactive container for the tracked token list.
//!
//! The list is a flat `Vec` searched linearly, guarded by a single lock and
//! mirrored into a [`tokio::sync::watch`] channel so that subscribers always
//! observe the latest snapshot (latest-value, multicast semantics). Every
//! read-modify-write cycle happens under the lock with no await point inside
//! the critical section, so concurrent enrichments cannot lose updates, and
//! the snapshot is published while the lock is still held, so snapshots
//! reach the channel in mutation order.

use crate::Token;
use alloy::primitives::Address;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

struct StoreInner {
    tokens: RwLock<Vec<Token>>,
    tx: watch::Sender<Vec<Token>>,
}

/// Shared, subscribable token list.
///
/// Cloning is cheap; all clones observe and mutate the same list.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<StoreInner>,
}

impl TokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                tokens: RwLock::new(Vec::new()),
                tx: watch::Sender::new(Vec::new()),
            }),
        }
    }

    /// Subscribes to the token list. The receiver immediately holds the
    /// current snapshot and is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Token>> {
        self.inner.tx.subscribe()
    }

    /// Returns a snapshot of the current token list.
    pub fn snapshot(&self) -> Vec<Token> {
        self.inner.tokens.read().expect("token list lock poisoned").clone()
    }

    /// Appends a token and republishes. No duplicate check is performed.
    pub fn push(&self, token: Token) {
        let mut tokens = self.inner.tokens.write().expect("token list lock poisoned");
        tokens.push(token);
        self.inner.tx.send_replace(tokens.clone());
    }

    /// Returns the first token with the given address, if present.
    pub fn get(&self, address: Address) -> Option<Token> {
        self.inner
            .tokens
            .read()
            .expect("token list lock poisoned")
            .iter()
            .find(|t| t.address == address)
            .cloned()
    }

    /// Returns true if a token with the given address is tracked.
    pub fn contains(&self, address: Address) -> bool {
        self.inner
            .tokens
            .read()
            .expect("token list lock poisoned")
            .iter()
            .any(|t| t.address == address)
    }

    /// Mutates the token with the given address in place.
    ///
    /// Republishes only when the record actually changed. Returns true if a
    /// change was published.
    pub fn update(&self, address: Address, f: impl FnOnce(&mut Token)) -> bool {
        let mut tokens = self.inner.tokens.write().expect("token list lock poisoned");
        let Some(token) = tokens.iter_mut().find(|t| t.address == address) else {
            return false;
        };
        let before = token.clone();
        f(token);
        if *token == before {
            return false;
        }
        self.inner.tx.send_replace(tokens.clone());
        true
    }

    /// Removes all tokens and republishes the empty list.
    pub fn clear(&self) {
        let mut tokens = self.inner.tokens.write().expect("token list lock poisoned");
        tokens.clear();
        self.inner.tx.send_replace(Vec::new());
    }

    /// Number of tracked tokens.
    pub fn len(&self) -> usize {
        self.inner.tokens.read().expect("token list lock poisoned").len()
    }

    /// Returns true if no tokens are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    const TOKEN_A: Address = address!("00000000000000000000000000000000000000aa");
    const TOKEN_B: Address = address!("00000000000000000000000000000000000000bb");

    #[test]
    fn test_push_and_get() {
        let store = TokenStore::new();
        assert!(store.is_empty());

        store.push(Token::stub(TOKEN_A));
        assert_eq!(store.len(), 1);
        assert!(store.contains(TOKEN_A));
        assert!(!store.contains(TOKEN_B));
        assert_eq!(store.get(TOKEN_A).unwrap().address, TOKEN_A);
        assert!(store.get(TOKEN_B).is_none());
    }

    #[test]
    fn test_subscriber_sees_latest_snapshot() {
        let store = TokenStore::new();
        let rx = store.subscribe();
        assert!(rx.borrow().is_empty());

        store.push(Token::stub(TOKEN_A));
        assert_eq!(rx.borrow().len(), 1);
        assert_eq!(rx.borrow()[0].address, TOKEN_A);
    }

    #[test]
    fn test_late_subscriber_replays_current_value() {
        let store = TokenStore::new();
        store.push(Token::stub(TOKEN_A));
        store.push(Token::stub(TOKEN_B));

        let rx = store.subscribe();
        assert_eq!(rx.borrow().len(), 2);
    }

    #[test]
    fn test_update_publishes_only_on_change() {
        let store = TokenStore::new();
        store.push(Token::stub(TOKEN_A));

        let changed = store.update(TOKEN_A, |t| t.balance = Some(U256::from(5u64)));
        assert!(changed);
        assert_eq!(store.get(TOKEN_A).unwrap().balance, Some(U256::from(5u64)));

        // Same value again: no change, no publish
        let changed = store.update(TOKEN_A, |t| t.balance = Some(U256::from(5u64)));
        assert!(!changed);

        // Unknown address: no-op
        let changed = store.update(TOKEN_B, |t| t.balance = Some(U256::ZERO));
        assert!(!changed);
    }

    #[test]
    fn test_clear() {
        let store = TokenStore::new();
        store.push(Token::stub(TOKEN_A));
        let rx = store.subscribe();

        store.clear();
        assert!(store.is_empty());
        assert!(rx.borrow().is_empty());
    }

    #[test]
    fn test_concurrent_mutations_publish_latest_snapshot() {
        // Publishing happens under the write lock, so the channel can never
        // be left holding a stale intermediate list
        let store = TokenStore::new();
        let rx = store.subscribe();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.push(Token::stub(TOKEN_A));
                        store.update(TOKEN_A, |t| {
                            let next = t.balance.unwrap_or(U256::ZERO) + U256::from(1u64);
                            t.balance = Some(next);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 200);
        assert_eq!(rx.borrow().as_slice(), store.snapshot().as_slice());
    }

    #[test]
    fn test_duplicate_push_is_allowed() {
        // Uniqueness is the caller's responsibility
        let store = TokenStore::new();
        store.push(Token::stub(TOKEN_A));
        store.push(Token::stub(TOKEN_A));
        assert_eq!(store.len(), 2);
    }
}
