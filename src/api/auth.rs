use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use std::sync::Arc;

use super::session::{AdminSession, RequestContext};
use super::validation::{LoginForm, validate_credentials};
use super::views::{Chrome, LoginView};
use super::{ApiError, AppState};
use crate::services::AuthError;

pub const LOGIN_SUCCESS: &str = "Login Success";
pub const LOGIN_INVALID_INPUT: &str = "Invalid input.";
pub const LOGIN_FAILED: &str = "Invalid username or password";
pub const LOGOUT_DONE: &str = "Bye";

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Html<String>, ApiError> {
    let flashes = ctx.take_flashes().await?;
    let owner = state.auth_service.owner().await?;

    let view = LoginView {
        chrome: Chrome::new(owner.as_ref(), ctx.user.as_ref(), flashes),
    };
    Ok(Html(view.render()))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, ApiError> {
    let Some((username, password)) = validate_credentials(&form) else {
        ctx.flash(LOGIN_INVALID_INPUT).await?;
        return Ok(Redirect::to("/login"));
    };

    match state.auth_service.login(username, password).await {
        Ok(user) => {
            tracing::info!("User {} logged in", user.username);
            ctx.sign_in(user).await?;
            ctx.flash(LOGIN_SUCCESS).await?;
            Ok(Redirect::to("/"))
        }
        Err(AuthError::InvalidCredentials | AuthError::UserNotFound) => {
            tracing::warn!("Failed login attempt for {username}");
            ctx.flash(LOGIN_FAILED).await?;
            Ok(Redirect::to("/login"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout(admin: AdminSession) -> Result<Redirect, ApiError> {
    let mut ctx = admin.ctx;
    if let Some(user) = &ctx.user {
        tracing::info!("User {} logged out", user.username);
    }
    ctx.sign_out().await?;
    ctx.flash(LOGOUT_DONE).await?;
    Ok(Redirect::to("/"))
}
