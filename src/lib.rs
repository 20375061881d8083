//! KALM administration server
//!
//! Session-protected back office for a small service business: client
//! records, scheduled appointments, a dashboard summary and a PDF report,
//! served as a JSON API plus a few page endpoints.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Signing key for the session cookie
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> AppResult<Self> {
        let cookie_key = cookie_key(&config.session.key)?;
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
            cookie_key,
        })
    }
}

/// Build the cookie signing key from configuration, or generate one
fn cookie_key(configured: &str) -> AppResult<Key> {
    if configured.is_empty() {
        tracing::warn!("No session key configured; sessions will not survive a restart");
        return Ok(Key::generate());
    }
    Key::try_from(configured.as_bytes())
        .map_err(|_| AppError::Internal("session.key must be at least 64 bytes long".to_string()))
}
