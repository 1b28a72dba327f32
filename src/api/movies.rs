use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use std::sync::Arc;

use super::session::{AdminSession, RequestContext};
use super::validation::{MovieForm, parse_movie_id, validate_movie};
use super::views::{Chrome, EditView, IndexView};
use super::{ApiError, AppState};

pub const ITEM_ADDED: &str = "New Item Added";
pub const ITEM_UPDATED: &str = "Item updated.";
pub const ITEM_DELETED: &str = "Delete Item";
/// Create and edit report bad input with slightly different wording.
pub const CREATE_INVALID_INPUT: &str = "Invalid input";
pub const EDIT_INVALID_INPUT: &str = "Invalid input.";

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Html<String>, ApiError> {
    let flashes = ctx.take_flashes().await?;
    let owner = state.auth_service.owner().await?;
    let movies = state.movie_service.list().await?;

    let view = IndexView {
        chrome: Chrome::new(owner.as_ref(), ctx.user.as_ref(), flashes),
        movies,
    };
    Ok(Html(view.render()))
}

/// POST /
pub async fn create(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, ApiError> {
    if let Some(input) = validate_movie(&form) {
        state.movie_service.create(input.title, input.year).await?;
        admin.ctx.flash(ITEM_ADDED).await?;
    } else {
        admin.ctx.flash(CREATE_INVALID_INPUT).await?;
    }

    Ok(Redirect::to("/"))
}

/// GET /movie/edit/{id}
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_movie_id(&raw_id)?;
    let movie = state.movie_service.get(id).await?;

    let flashes = admin.ctx.take_flashes().await?;
    let owner = state.auth_service.owner().await?;

    let view = EditView {
        chrome: Chrome::new(owner.as_ref(), admin.ctx.user.as_ref(), flashes),
        movie,
    };
    Ok(Html(view.render()))
}

/// POST /movie/edit/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(raw_id): Path<String>,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, ApiError> {
    let id = parse_movie_id(&raw_id)?;
    // Unknown ids are a 404 even when the form is also invalid.
    state.movie_service.get(id).await?;

    let Some(input) = validate_movie(&form) else {
        admin.ctx.flash(EDIT_INVALID_INPUT).await?;
        return Ok(Redirect::to(&format!("/movie/edit/{id}")));
    };

    state
        .movie_service
        .update(id, input.title, input.year)
        .await?;
    admin.ctx.flash(ITEM_UPDATED).await?;

    Ok(Redirect::to("/"))
}

/// POST /movie/delete/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(raw_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let id = parse_movie_id(&raw_id)?;
    state.movie_service.delete(id).await?;
    admin.ctx.flash(ITEM_DELETED).await?;

    Ok(Redirect::to("/"))
}
