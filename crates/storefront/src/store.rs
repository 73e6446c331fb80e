//! The cart store: single source of truth for what is in the cart.
//!
//! One [`CartStore`] is built at start-up and handed to every consumer
//! (HTTP handlers through `AppState`, the CLI directly). Commands are
//! serialized through a writer lock; each one runs the pure reducer from
//! `tavola_core`, writes the resulting snapshot to the storage slot, and only
//! then publishes it to subscribers.
//!
//! Storage failures are logged and swallowed: the command still succeeds and
//! the new state is still published, it just is not durable.

use std::sync::{Arc, Mutex, PoisonError};

use tavola_core::{CartCommand, CartItem, CartState, MenuItemId};
use tokio::sync::watch;

use crate::storage::{CartStorage, StorageError};

/// Cart state holder with persistence and publish/subscribe reads.
pub struct CartStore {
    storage: Arc<dyn CartStorage>,
    key: String,
    writer: Mutex<()>,
    state: watch::Sender<CartState>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the store and rehydrate it from the storage slot.
    ///
    /// A snapshot is only loaded if it holds at least one line; empty,
    /// missing, unreadable or malformed snapshots leave the cart empty.
    #[must_use]
    pub fn open(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let store = Self::empty(storage, key);

        let snapshot = store.read_snapshot();
        if snapshot.is_empty() {
            tracing::debug!(key = %store.key, "no cart to rehydrate");
        } else {
            tracing::info!(
                key = %store.key,
                lines = snapshot.items().len(),
                total = %snapshot.total(),
                "rehydrating cart"
            );
            store.dispatch(CartCommand::Load(snapshot));
        }

        store
    }

    /// Create an empty store without reading the slot.
    #[must_use]
    pub fn empty(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            storage,
            key: key.into(),
            writer: Mutex::new(()),
            state,
        }
    }

    /// Storage slot this store mirrors into.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    ///
    /// The receiver starts at the current state and is notified after every
    /// command, including commands that leave the state unchanged.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Apply a command, persist and publish the result.
    pub fn dispatch(&self, command: CartCommand) -> CartState {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let name = command.name();
        let next = self.state.borrow().apply(command);
        self.persist(&next);
        self.state.send_replace(next.clone());

        tracing::debug!(
            command = name,
            lines = next.items().len(),
            total = %next.total(),
            "cart updated"
        );
        next
    }

    /// Add one unit of an item.
    pub fn add_item(&self, item: CartItem) -> CartState {
        self.dispatch(CartCommand::AddItem(item))
    }

    /// Remove an item's line. Unknown IDs leave the cart unchanged.
    pub fn remove_item(&self, id: MenuItemId) -> CartState {
        self.dispatch(CartCommand::RemoveItem(id))
    }

    /// Set an item's quantity; zero or below removes it.
    pub fn update_quantity(&self, id: MenuItemId, quantity: i64) -> CartState {
        self.dispatch(CartCommand::UpdateQuantity { id, quantity })
    }

    /// Empty the cart.
    pub fn clear(&self) -> CartState {
        self.dispatch(CartCommand::Clear)
    }

    /// Empty the cart and delete its storage slot instead of writing an
    /// empty snapshot.
    ///
    /// Subscribers see the empty cart even when the slot cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be removed.
    pub fn purge(&self) -> Result<CartState, StorageError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let removed = self.storage.remove(&self.key);
        self.state.send_replace(CartState::default());

        tracing::info!(key = %self.key, ok = removed.is_ok(), "cart slot purged");
        removed.map(|()| CartState::default())
    }

    fn read_snapshot(&self) -> CartState {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartState::default(),
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to read cart snapshot");
                return CartState::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "ignoring malformed cart snapshot");
            CartState::default()
        })
    }

    fn persist(&self, state: &CartState) {
        let raw = match serde_json::to_string(state) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to encode cart snapshot");
                return;
            }
        };

        if let Err(e) = self.storage.write(&self.key, &raw) {
            tracing::error!(key = %self.key, error = %e, "failed to save cart snapshot");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tavola_core::Price;

    use super::*;
    use crate::storage::{CART_STORAGE_KEY, MemoryStorage, StorageError};

    /// Counts writes and can be told to fail every operation.
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
        broken: bool,
    }

    impl CountingStorage {
        fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl CartStorage for CountingStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.broken {
                return Err(StorageError::Unavailable("disk on fire".to_string()));
            }
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(StorageError::Unavailable("disk on fire".to_string()));
            }
            self.inner.write(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn item(id: &str, cents: i64) -> CartItem {
        CartItem::new(id, format!("Item {id}"), Price::from_cents(cents))
    }

    fn stored(storage: &dyn CartStorage) -> CartState {
        let raw = storage.read(CART_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_every_command_is_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);

        store.add_item(item("a", 1000));
        store.add_item(item("b", 500));
        let state = store.update_quantity(MenuItemId::from("a"), 3);

        assert_eq!(state.total(), Price::from_cents(3500));
        assert_eq!(stored(storage.as_ref()), state);
        assert_eq!(store.current(), state);
    }

    #[test]
    fn test_rehydrates_large_totals_to_the_cent() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);
        store.add_item(item("b", 5_169_810));
        store.update_quantity(MenuItemId::from("b"), 1_608_891_455);
        let saved = store.add_item(item("a", 6_307_107));
        assert_eq!(saved.total().to_string(), "$83176631392806.57");

        let reopened = CartStore::open(storage, CART_STORAGE_KEY).current();
        assert_eq!(reopened, saved);
        assert!(reopened.is_consistent());
    }

    #[test]
    fn test_purge_deletes_slot() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);
        let mut receiver = store.subscribe();
        store.add_item(item("a", 1000));

        let cart = store.purge().unwrap();

        assert!(cart.is_empty());
        assert!(store.current().is_empty());
        assert!(receiver.borrow_and_update().is_empty());
        assert!(storage.read(CART_STORAGE_KEY).unwrap().is_none());
        assert!(CartStore::open(storage, CART_STORAGE_KEY).current().is_empty());
    }

    #[test]
    fn test_noop_commands_still_write() {
        let storage = Arc::new(CountingStorage::default());
        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);
        assert_eq!(storage.writes(), 0);

        let state = store.remove_item(MenuItemId::from("missing"));

        assert_eq!(state, CartState::default());
        assert_eq!(storage.writes(), 1);
        assert_eq!(stored(&storage.inner), CartState::default());
    }

    #[test]
    fn test_rehydrates_non_empty_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        let expected = {
            let first = CartStore::open(storage.clone(), CART_STORAGE_KEY);
            first.add_item(item("a", 2499));
            first.add_item(item("a", 2499))
        };

        let second = CartStore::open(storage, CART_STORAGE_KEY);

        assert_eq!(second.current(), expected);
        assert_eq!(second.current().items()[0].quantity, 2);
    }

    #[test]
    fn test_empty_snapshot_is_not_loaded() {
        let storage = Arc::new(CountingStorage::default());
        storage
            .inner
            .write(CART_STORAGE_KEY, r#"{"items":[],"total":0}"#)
            .unwrap();

        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);

        assert!(store.current().is_empty());
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn test_malformed_snapshot_is_treated_as_empty() {
        let storage = Arc::new(MemoryStorage::with_slot(CART_STORAGE_KEY, "{not json"));

        let store = CartStore::open(storage, CART_STORAGE_KEY);

        assert_eq!(store.current(), CartState::default());
    }

    #[test]
    fn test_storage_failures_do_not_fail_commands() {
        let storage = Arc::new(CountingStorage::broken());
        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);

        let state = store.add_item(item("a", 1000));

        assert_eq!(state.items().len(), 1);
        assert_eq!(store.current(), state);
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn test_subscribers_see_every_command() {
        let store = CartStore::open(Arc::new(MemoryStorage::new()), CART_STORAGE_KEY);
        let mut first = store.subscribe();
        let mut second = store.subscribe();
        assert!(!first.has_changed().unwrap());

        store.add_item(item("a", 1000));

        assert!(first.has_changed().unwrap());
        assert_eq!(first.borrow_and_update().total(), Price::from_cents(1000));
        assert_eq!(*second.borrow_and_update(), store.current());

        store.remove_item(MenuItemId::from("missing"));
        assert!(first.has_changed().unwrap());
    }

    #[test]
    fn test_clear_persists_empty_cart() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::open(storage.clone(), CART_STORAGE_KEY);
        store.add_item(item("a", 1000));

        let state = store.clear();

        assert_eq!(state, CartState::default());
        assert_eq!(stored(storage.as_ref()), CartState::default());
    }

    #[test]
    fn test_concurrent_writers_keep_total_consistent() {
        let store = Arc::new(CartStore::open(Arc::new(MemoryStorage::new()), CART_STORAGE_KEY));

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.add_item(item(if n % 2 == 0 { "even" } else { "odd" }, 125));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = store.current();
        assert_eq!(state.item_count(), 400);
        assert_eq!(state.total(), Price::from_cents(50_000));
        assert!(state.is_consistent());
    }
}
