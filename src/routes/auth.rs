// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.
//!
//! Login and registration answer with the user and a session JWT, and also
//! set the JWT as an HttpOnly cookie so browser clients need not store it.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, verify_jwt, SESSION_COOKIE};
use crate::models::forms::{LoginForm, RegistrationForm};
use crate::models::{AuthResponse, User};
use crate::AppState;

/// Upper bound on the cookie lifetime, in days.
const MAX_COOKIE_DAYS: u64 = 3650;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<RegistrationForm>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let user = state.auth_service.register(form).await?;
    let (jar, response) = start_session(&state.config, jar, user)?;
    Ok((StatusCode::CREATED, jar, Json(response)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let user = state.auth_service.login(&form.email, &form.password).await?;
    let (jar, response) = start_session(&state.config, jar, user)?;
    Ok((jar, Json(response)))
}

/// Clear the session cookie. Works with or without a valid session.
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
        });

    if let Some(user_id) = token.and_then(|t| verify_jwt(&t, &state.config.jwt_signing_key).ok()) {
        state.auth_service.logout(&user_id);
    }

    let removal = session_cookie(&state.config, String::new(), time::Duration::ZERO);
    (jar.add(removal), Json(json!({ "success": true })))
}

fn start_session(config: &Config, jar: CookieJar, user: User) -> Result<(CookieJar, AuthResponse)> {
    let token = create_jwt(&user.id, &config.jwt_signing_key, config.session_ttl_days)
        .map_err(AppError::Internal)?;

    let days = config.session_ttl_days.min(MAX_COOKIE_DAYS) as i64;
    let cookie = session_cookie(config, token.clone(), time::Duration::days(days));

    Ok((jar.add(cookie), AuthResponse { user, token }))
}

/// Session cookie with matching attributes for creation and removal.
/// `Secure` is only set when the frontend is served over HTTPS.
fn session_cookie(config: &Config, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.frontend_url.starts_with("https://"))
        .max_age(max_age)
        .build()
}
