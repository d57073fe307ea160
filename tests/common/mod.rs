// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use tutorhub::config::Config;
use tutorhub::db::Db;
use tutorhub::middleware::auth::create_jwt;
use tutorhub::models::{Class, ClassStatus, Subject, TutorSummary, User};
use tutorhub::routes::create_router;
use tutorhub::AppState;

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_db(Config::test_default(), Db::in_memory()));
    (create_router(state.clone()), state)
}

/// Create a session token the middleware accepts.
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key, 1).expect("Failed to create JWT")
}

/// Build a JSON request, optionally authenticated with a bearer token.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through a clone of the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register an account through the API. Returns the user and session token.
pub async fn register(app: &Router, email: &str, role: &str) -> (User, String) {
    let response = send(
        app,
        json_request(
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({
                "firstName": "Test",
                "lastName": "User",
                "email": email,
                "password": "password123",
                "confirmPassword": "password123",
                "role": role,
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "registration of {} failed", email);

    let body = body_json(response).await;
    let user: User = serde_json::from_value(body["user"].clone()).unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (user, token)
}

/// A scheduled class taught by `tutor_id`.
pub fn sample_class(id: &str, subject: &str, title: &str, tutor_id: &str, capacity: u32) -> Class {
    Class {
        id: id.to_string(),
        subject: Subject::from_id(subject),
        topic: title.to_string(),
        title: title.to_string(),
        description: format!("An introduction to {}", title),
        tutor: TutorSummary {
            id: tutor_id.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            profile_picture: None,
            rating: 4.5,
        },
        date_time: Utc::now() + Duration::days(7),
        duration: 60,
        status: ClassStatus::Scheduled,
        capacity,
        enrolled_students: Vec::new(),
    }
}

/// Serve the app on an ephemeral local port.
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Fresh per-test directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tutorhub-{}-{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
