// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Protected routes accept bearer tokens and the session cookie
//! 3. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

mod common;
use common::{body_json, json_request, send};

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app();

    let response = send(&app, json_request("GET", "/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();

    for uri in ["/api/me", "/classes/upcoming", "/class-requests", "/tutors/t1/reviews"] {
        let response = send(&app, json_request("GET", uri, None, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        json_request("GET", "/api/me", Some("invalid.token.here"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let (app, state) = common::create_test_app();
    let (user, _) = common::register(&app, "old@example.com", "student").await;

    let claims = Claims {
        sub: user.id,
        exp: 1_000_000,
        iat: 900_000,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&state.config.jwt_signing_key),
    )
    .unwrap();

    let response = send(&app, json_request("GET", "/api/me", Some(token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_not_found() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user_ghost", &state.config.jwt_signing_key);

    let response = send(&app, json_request("GET", "/api/me", Some(token.as_str()), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let (app, _) = common::create_test_app();
    let (user, token) = common::register(&app, "cookie@example.com", "student").await;

    let response = send(
        &app,
        Request::builder()
            .uri("/api/me")
            .header(header::COOKIE, format!("tutorhub_token={}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], user.id.as_str());
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        Request::builder()
            .method("OPTIONS")
            .uri("/classes/upcoming")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let (app, _) = common::create_test_app();

    // Hosts that merely start with "localhost" are not local
    for origin in ["https://evil.example", "http://localhost.evil.example"] {
        let response = send(
            &app,
            Request::builder()
                .method("OPTIONS")
                .uri("/classes/upcoming")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none(),
            "origin {} should be rejected",
            origin
        );
    }
}
