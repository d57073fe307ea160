// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the signed-in user.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::forms::UserUpdate;
use crate::models::User;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me).put(update_me))
}

/// Load the full user behind a session token.
pub(crate) fn current_user(state: &AppState, auth: &AuthUser) -> Result<User> {
    state.auth_service.get_user(&auth.user_id)
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    Ok(Json(current_user(&state, &user)?))
}

/// Edit name or profile picture.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>> {
    let updated = state.auth_service.update_user(&user.user_id, update)?;
    tracing::info!(user_id = %updated.id, "User profile updated");
    Ok(Json(updated))
}
