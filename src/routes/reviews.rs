// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tutor review routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::forms::ReviewForm;
use crate::models::Review;
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
        .route("/tutors/{tutor_id}/reviews", get(tutor_reviews))
        .route("/reviews", post(create_review))
}

/// Reviews of a tutor, newest first.
async fn tutor_reviews(
    State(state): State<Arc<AppState>>,
    Path(tutor_id): Path<String>,
) -> Result<Json<Vec<Review>>> {
    Ok(Json(state.class_service.reviews_for_tutor(&tutor_id)?))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<ReviewForm>,
) -> Result<(StatusCode, Json<Review>)> {
    let author = current_user(&state, &user)?;
    let review = state.class_service.create_review(&author, form)?;
    Ok((StatusCode::CREATED, Json(review)))
}
