use anyhow::Context;
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use rand::RngCore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::config::{Config, ServerConfig};
use crate::db::Store;
use crate::services::{AuthService, MovieService, SeaOrmAuthService, SeaOrmMovieService};

pub mod auth;
mod error;
pub mod movies;
pub mod session;
pub mod settings;
pub mod validation;
pub mod views;

pub use error::ApiError;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub movie_service: Arc<dyn MovieService>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            auth_service: Arc::new(SeaOrmAuthService::new(store.clone())),
            movie_service: Arc::new(SeaOrmMovieService::new(store.clone())),
            config,
            store,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::from_config(&config).await?;
    Ok(Arc::new(AppState::new(config, store)))
}

pub fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let server = &state.config.server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )))
        .with_signed(session_key(server)?);

    Ok(Router::new()
        .route("/", get(movies::index).post(movies::create))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route(
            "/settings",
            get(settings::settings_page).post(settings::update_settings),
        )
        .route(
            "/movie/edit/{id}",
            get(movies::edit_page).post(movies::update),
        )
        .route("/movie/delete/{id}", post(movies::delete))
        .fallback(not_found)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Signing key for the session cookie: the configured secret, or fresh random
/// bytes when none is configured.
fn session_key(server: &ServerConfig) -> anyhow::Result<Key> {
    if let Some(secret) = &server.secret_key {
        return Key::try_from(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("Invalid session secret key");
    }

    tracing::warn!("No secret_key configured; sessions will not survive a restart");
    let mut bytes = [0u8; 64];
    rand::rng().fill_bytes(&mut bytes);
    Ok(Key::from(&bytes[..]))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(views::not_found_page()))
}
