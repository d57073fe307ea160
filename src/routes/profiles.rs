// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student and tutor profile routes. Anyone signed in may read a profile;
//! only its owner may change it.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{StudentProfile, TutorProfile};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profiles/student/{user_id}",
            get(get_student_profile).put(update_student_profile),
        )
        .route(
            "/profiles/tutor/{user_id}",
            get(get_tutor_profile).put(update_tutor_profile),
        )
}

fn require_owner(auth: &AuthUser, user_id: &str) -> Result<()> {
    if auth.user_id != user_id {
        tracing::warn!(
            caller = %auth.user_id,
            owner = %user_id,
            "Refused profile edit by non-owner"
        );
        return Err(AppError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }
    Ok(())
}

async fn get_student_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<StudentProfile>> {
    Ok(Json(state.auth_service.get_student_profile(&user_id)?))
}

async fn update_student_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<StudentProfile>> {
    require_owner(&auth, &user_id)?;
    Ok(Json(
        state.auth_service.update_student_profile(&user_id, profile)?,
    ))
}

async fn get_tutor_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<TutorProfile>> {
    Ok(Json(state.auth_service.get_tutor_profile(&user_id)?))
}

async fn update_tutor_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(profile): Json<TutorProfile>,
) -> Result<Json<TutorProfile>> {
    require_owner(&auth, &user_id)?;
    Ok(Json(state.auth_service.update_tutor_profile(&user_id, profile)?))
}
