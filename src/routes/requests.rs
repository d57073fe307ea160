// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Class request routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::forms::ClassRequestForm;
use crate::models::ClassRequest;
use crate::routes::api::current_user;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/class-requests",
            get(list_class_requests).post(create_class_request),
        )
        .route("/class-requests/{id}/request", post(request_class))
}

async fn list_class_requests(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ClassRequest>>> {
    Ok(Json(state.class_service.class_requests()?))
}

async fn create_class_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<ClassRequestForm>,
) -> Result<(StatusCode, Json<ClassRequest>)> {
    let student = current_user(&state, &user)?;
    let request = state.class_service.create_class_request(&student, form)?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Join an existing request.
async fn request_class(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ClassRequest>> {
    Ok(Json(state.class_service.request_class(&id, &user.user_id)?))
}
