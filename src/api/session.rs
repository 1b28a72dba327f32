//! Per-request authentication state and flash messages.
//!
//! The session cookie only carries an id into the server-side store; the
//! store holds the authenticated user id and pending flash messages.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState};
use crate::db::User;

const USER_ID_KEY: &str = "user_id";
const FLASH_KEY: &str = "_flashes";

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// Request-scoped view of the session: who is calling, plus access to the
/// flash queue.
pub struct RequestContext {
    pub user: Option<User>,
    session: Session,
}

impl RequestContext {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Queue a message for the next rendered page.
    pub async fn flash(&self, message: impl Into<String>) -> Result<(), ApiError> {
        let mut pending: Vec<String> = self.session.get(FLASH_KEY).await?.unwrap_or_default();
        pending.push(message.into());
        self.session.insert(FLASH_KEY, pending).await?;
        Ok(())
    }

    /// Drain queued messages. Each one is shown exactly once.
    pub async fn take_flashes(&self) -> Result<Vec<String>, ApiError> {
        Ok(self
            .session
            .remove::<Vec<String>>(FLASH_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Mark the session as belonging to `user`. The session id is rotated so
    /// an id issued before login cannot be reused afterwards.
    pub async fn sign_in(&mut self, user: User) -> Result<(), ApiError> {
        self.session.cycle_id().await?;
        self.session.insert(USER_ID_KEY, user.id).await?;
        self.user = Some(user);
        Ok(())
    }

    pub async fn sign_out(&mut self) -> Result<(), ApiError> {
        self.session.remove::<i32>(USER_ID_KEY).await?;
        self.session.cycle_id().await?;
        self.user = None;
        Ok(())
    }
}

impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let user = match session.get::<i32>(USER_ID_KEY).await? {
            Some(id) => {
                let user = state.auth_service.current_user(id).await?;
                if user.is_none() {
                    tracing::debug!("Session refers to missing user {id}");
                }
                user
            }
            None => None,
        };

        Ok(Self { user, session })
    }
}

/// Extractor for routes that change state. Anonymous callers are sent to the
/// login page with a notice instead of reaching the handler.
pub struct AdminSession {
    pub ctx: RequestContext,
}

impl AdminSession {
    /// The authenticated user. Always present once extraction succeeded.
    pub fn user(&self) -> Result<&User, ApiError> {
        self.ctx
            .user
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;

        if !ctx.is_authenticated() {
            ctx.flash(LOGIN_REQUIRED).await?;
            return Err(ApiError::Unauthorized(format!(
                "{} {}",
                parts.method, parts.uri
            )));
        }

        Ok(Self { ctx })
    }
}
