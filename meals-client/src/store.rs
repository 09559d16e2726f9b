//! Client-side cart store
//!
//! The cart is mutated optimistically: the local mapping changes first,
//! then the server is told. A server rejection triggers the compensating
//! action, and the caller receives an explicit outcome rather than a
//! silently-reverted mapping.

use std::sync::Arc;

use shared::models::CartData;

use crate::http::CartTransport;

/// Result of a two-phase cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Local and remote carts agree on the new state.
    Committed(CartData),
    /// The server rejected the mutation; the local cart was restored to
    /// its pre-mutation state.
    RolledBack { cart: CartData, reason: String },
}

impl MutationOutcome {
    /// The cart as the UI should now render it.
    pub fn cart(&self) -> &CartData {
        match self {
            MutationOutcome::Committed(cart) => cart,
            MutationOutcome::RolledBack { cart, .. } => cart,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }
}

/// Explicit cart state holder, passed by reference to UI components.
/// Synchronization points are `sync` (on load) and each mutation.
pub struct CartStore<T: CartTransport + ?Sized> {
    local: CartData,
    transport: Arc<T>,
}

impl<T: CartTransport + ?Sized> CartStore<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            local: CartData::new(),
            transport,
        }
    }

    /// Current local mapping.
    pub fn cart(&self) -> &CartData {
        &self.local
    }

    /// Replace the local mapping with the server's (on load / login).
    pub async fn sync(&mut self) -> Result<&CartData, crate::ClientError> {
        self.local = self.transport.fetch().await?;
        Ok(&self.local)
    }

    /// Optimistically increment, then confirm with the server.
    pub async fn add_item(&mut self, item_id: &str) -> MutationOutcome {
        let snapshot = self.local.clone();
        self.local.increment(item_id);

        match self.transport.add_item(item_id).await {
            Ok(()) => MutationOutcome::Committed(self.local.clone()),
            Err(e) => {
                self.local = snapshot;
                tracing::warn!(item_id, error = %e, "Cart add rolled back");
                MutationOutcome::RolledBack {
                    cart: self.local.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Optimistically decrement, then confirm with the server.
    pub async fn remove_item(&mut self, item_id: &str) -> MutationOutcome {
        let snapshot = self.local.clone();
        self.local.decrement(item_id);

        match self.transport.remove_item(item_id).await {
            Ok(()) => MutationOutcome::Committed(self.local.clone()),
            Err(e) => {
                self.local = snapshot;
                tracing::warn!(item_id, error = %e, "Cart remove rolled back");
                MutationOutcome::RolledBack {
                    cart: self.local.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Clear both sides; the local cart empties even if the server call
    /// fails (matches post-checkout behavior where the order already
    /// owns the item snapshot).
    pub async fn clear(&mut self) -> Result<(), crate::ClientError> {
        self.local.clear();
        self.transport.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientError, ClientResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Transport stub: rejects mutations when `reject` is set.
    struct StubTransport {
        reject: AtomicBool,
        remote: std::sync::Mutex<CartData>,
    }

    impl StubTransport {
        fn new() -> Self {
            Self {
                reject: AtomicBool::new(false),
                remote: std::sync::Mutex::new(CartData::new()),
            }
        }

        fn set_reject(&self, reject: bool) {
            self.reject.store(reject, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CartTransport for StubTransport {
        async fn add_item(&self, item_id: &str) -> ClientResult<()> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(ClientError::Rejected("User not found".to_string()));
            }
            self.remote.lock().unwrap().increment(item_id);
            Ok(())
        }

        async fn remove_item(&self, item_id: &str) -> ClientResult<()> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(ClientError::Rejected("User not found".to_string()));
            }
            self.remote.lock().unwrap().decrement(item_id);
            Ok(())
        }

        async fn fetch(&self) -> ClientResult<CartData> {
            Ok(self.remote.lock().unwrap().clone())
        }

        async fn clear(&self) -> ClientResult<()> {
            self.remote.lock().unwrap().clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn add_commits_when_server_accepts() {
        let transport = Arc::new(StubTransport::new());
        let mut store = CartStore::new(transport.clone());

        let outcome = store.add_item("food:chapati").await;
        assert!(outcome.is_committed());
        assert_eq!(outcome.cart().quantity("food:chapati"), 1);
        assert_eq!(transport.fetch().await.unwrap().quantity("food:chapati"), 1);
    }

    #[tokio::test]
    async fn rejection_restores_the_snapshot() {
        let transport = Arc::new(StubTransport::new());
        let mut store = CartStore::new(transport.clone());

        store.add_item("food:pilau").await;
        transport.set_reject(true);

        let outcome = store.add_item("food:pilau").await;
        match outcome {
            MutationOutcome::RolledBack { cart, reason } => {
                assert_eq!(cart.quantity("food:pilau"), 1, "optimistic bump reverted");
                assert!(reason.contains("User not found"));
            }
            MutationOutcome::Committed(_) => panic!("expected rollback"),
        }
        assert_eq!(store.cart().quantity("food:pilau"), 1);
    }

    #[tokio::test]
    async fn remove_rollback_restores_quantity() {
        let transport = Arc::new(StubTransport::new());
        let mut store = CartStore::new(transport.clone());
        store.add_item("food:ugali").await;
        store.add_item("food:ugali").await;

        transport.set_reject(true);
        let outcome = store.remove_item("food:ugali").await;

        assert!(!outcome.is_committed());
        assert_eq!(store.cart().quantity("food:ugali"), 2);
    }

    #[tokio::test]
    async fn sync_adopts_remote_state() {
        let transport = Arc::new(StubTransport::new());
        transport.remote.lock().unwrap().increment("food:samosa");

        let mut store = CartStore::new(transport);
        store.sync().await.unwrap();
        assert_eq!(store.cart().quantity("food:samosa"), 1);
    }

    #[tokio::test]
    async fn clear_empties_both_sides() {
        let transport = Arc::new(StubTransport::new());
        let mut store = CartStore::new(transport.clone());
        store.add_item("food:chips").await;

        store.clear().await.unwrap();
        assert!(store.cart().is_empty());
        assert!(transport.fetch().await.unwrap().is_empty());
    }
}
