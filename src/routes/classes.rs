// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Class routes: listings, search, creation and enrollment.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::forms::ClassForm;
use crate::models::Class;
use crate::routes::api::current_user;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/classes", post(create_class))
        .route("/classes/upcoming", get(upcoming_classes))
        .route("/classes/discover", get(discover_classes))
        .route("/classes/search", get(search_classes))
        .route("/classes/{id}", get(get_class))
        .route("/classes/{id}/enroll", post(enroll))
}

#[derive(Deserialize)]
struct DiscoverQuery {
    /// Comma-separated subject ids
    #[serde(default)]
    subjects: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn parse_subjects(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Classes the caller is enrolled in or teaching.
async fn upcoming_classes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Class>>> {
    Ok(Json(state.class_service.upcoming_classes(&user.user_id)?))
}

async fn discover_classes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<Vec<Class>>> {
    let subjects = parse_subjects(query.subjects.as_deref());
    Ok(Json(state.class_service.discover_classes(&subjects)?))
}

async fn search_classes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Class>>> {
    let results = state.class_service.search_classes(&query.q)?;
    tracing::debug!(query = %query.q, count = results.len(), "Class search");
    Ok(Json(results))
}

async fn get_class(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Class>> {
    Ok(Json(state.class_service.get_class(&id)?))
}

async fn create_class(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<ClassForm>,
) -> Result<(StatusCode, Json<Class>)> {
    let tutor = current_user(&state, &user)?;
    let class = state.class_service.create_class(&tutor, form)?;
    Ok((StatusCode::CREATED, Json(class)))
}

async fn enroll(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Class>> {
    Ok(Json(state.class_service.enroll(&id, &user.user_id)?))
}
