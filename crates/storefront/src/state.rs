//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use bistro_core::CartSession;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::orders::OrderClient;

/// How long an untouched cart session is kept before it is dropped.
const SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on concurrently tracked cart sessions.
const MAX_SESSIONS: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the order client, and the per-visitor cart sessions. Carts are
/// in-memory only and do not survive a restart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: OrderClient,
    sessions: Cache<Uuid, Arc<Mutex<CartSession>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let orders = OrderClient::new(config.order_endpoint.clone());
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(SESSION_IDLE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order submission client.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }

    /// Get (or create) the cart session for a visitor.
    #[must_use]
    pub fn session(&self, id: Uuid) -> Arc<Mutex<CartSession>> {
        self.inner
            .sessions
            .get_with(id, || Arc::new(Mutex::new(CartSession::new())))
    }
}

/// Lock a cart session, mapping a poisoned lock to an internal error.
///
/// # Errors
///
/// Returns `AppError::Internal` if a handler panicked while holding the lock.
pub fn lock_session(
    session: &Arc<Mutex<CartSession>>,
) -> Result<MutexGuard<'_, CartSession>, AppError> {
    session
        .lock()
        .map_err(|_| AppError::Internal("cart session lock poisoned".to_string()))
}
