//! Application state shared across handlers.
//!
//! Every piece of section state sits behind a `std::sync` lock held only
//! for synchronous work; no guard lives across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use inventrak_core::alerts::{LowStockBoard, UrgencyPolicy};
use inventrak_core::cart::Cart;
use inventrak_core::catalog::{Catalog, Product};
use inventrak_core::marketplace::Listing;
use inventrak_core::reports::Ledger;
use inventrak_core::seed;
use inventrak_core::settings::NotificationSettings;

use crate::config::ServerConfig;
use crate::services::session::{
    AcceptAnyCredentials, CredentialVerifier, FileSessionStorage, SessionError, SessionStorage,
    SessionStore, StaticCredentials,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    session: SessionStore,
    catalog: RwLock<Catalog>,
    listings: Vec<Listing>,
    pos_cart: Mutex<Cart<Product>>,
    marketplace_cart: Mutex<Cart<Listing>>,
    low_stock: Mutex<LowStockBoard>,
    ledger: RwLock<Ledger>,
    notifications: RwLock<NotificationSettings>,
}

impl AppState {
    /// Create state backed by the session file under `config.session_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing session record cannot be read.
    pub fn new(config: ServerConfig) -> Result<Self, SessionError> {
        let storage = Arc::new(FileSessionStorage::new(&config.session_dir));
        Self::with_storage(config, storage)
    }

    /// Create state with an explicit session storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing session record cannot be read.
    pub fn with_storage(
        config: ServerConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, SessionError> {
        let verifier: Arc<dyn CredentialVerifier> = match &config.credentials {
            Some(entries) => Arc::new(StaticCredentials::new(entries)),
            None => Arc::new(AcceptAnyCredentials),
        };
        let session = SessionStore::open(storage, verifier, config.auth_delay)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                catalog: RwLock::new(Catalog::new(seed::products())),
                listings: seed::listings(),
                pos_cart: Mutex::new(Cart::new()),
                marketplace_cart: Mutex::new(Cart::new()),
                low_stock: Mutex::new(LowStockBoard::new(seed::notified())),
                ledger: RwLock::new(Ledger::default()),
                notifications: RwLock::new(NotificationSettings::default()),
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn urgency(&self) -> &UrgencyPolicy {
        &self.inner.config.urgency
    }

    /// Read access to the product catalog.
    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the product catalog (inventory edits).
    pub fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Supplier marketplace listings (read-only).
    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.inner.listings
    }

    pub fn pos_cart(&self) -> MutexGuard<'_, Cart<Product>> {
        self.inner
            .pos_cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn marketplace_cart(&self) -> MutexGuard<'_, Cart<Listing>> {
        self.inner
            .marketplace_cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Empty both carts so nothing carries over to the next sign-in.
    pub fn reset_section_state(&self) {
        self.pos_cart().clear();
        self.marketplace_cart().clear();
        tracing::debug!("Carts cleared");
    }

    pub fn low_stock(&self) -> MutexGuard<'_, LowStockBoard> {
        self.inner
            .low_stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ledger(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner
            .ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ledger_mut(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner
            .ledger
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notifications(&self) -> RwLockReadGuard<'_, NotificationSettings> {
        self.inner
            .notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notifications_mut(&self) -> RwLockWriteGuard<'_, NotificationSettings> {
        self.inner
            .notifications
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
