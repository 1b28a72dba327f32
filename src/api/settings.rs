use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use std::sync::Arc;

use super::session::AdminSession;
use super::validation::{SettingsForm, validate_name};
use super::views::{Chrome, SettingsView};
use super::{ApiError, AppState};

pub const INVALID_NAME: &str = "Invalid Name";

/// GET /settings
pub async fn settings_page(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
) -> Result<Html<String>, ApiError> {
    let user = admin.user()?;
    let flashes = admin.ctx.take_flashes().await?;
    let owner = state.auth_service.owner().await?;

    let view = SettingsView {
        chrome: Chrome::new(owner.as_ref(), Some(user), flashes),
        current_name: user.name.clone(),
    };
    Ok(Html(view.render()))
}

/// POST /settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect, ApiError> {
    let user_id = admin.user()?.id;

    let Some(name) = validate_name(&form) else {
        admin.ctx.flash(INVALID_NAME).await?;
        return Ok(Redirect::to("/settings"));
    };

    let user = state.auth_service.rename(user_id, name).await?;
    tracing::info!("User {} renamed to {}", user.username, user.name);
    admin
        .ctx
        .flash(format!("Settings updated: {}", user.name))
        .await?;

    Ok(Redirect::to("/"))
}
