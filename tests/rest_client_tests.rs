// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST-mode client and session against a live server.

use std::sync::Arc;
use tutorhub::client::{ApiClient, RestApi, TutorApi};
use tutorhub::db::{keys, KeyValueStore, MemoryStore};
use tutorhub::error::AppError;
use tutorhub::models::forms::{ClassRequestForm, RegistrationForm};
use tutorhub::models::{ActiveRole, Role};
use tutorhub::services::{AuthBackend, AuthSession, RoleState};

mod common;

fn registration(email: &str, role: Role) -> RegistrationForm {
    RegistrationForm {
        first_name: "Alice".to_string(),
        last_name: "Liddell".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        confirm_password: "password123".to_string(),
        role,
    }
}

async fn remote_session() -> (AuthSession, TutorApi, Arc<dyn KeyValueStore>) {
    let (_, state) = common::create_test_app();
    let addr = common::spawn_server(state).await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = TutorApi::new(RestApi::new(format!("http://{}", addr), store.clone()));
    let session = AuthSession::new(store.clone(), AuthBackend::Remote(api.clone()));
    (session, api, store)
}

#[tokio::test]
async fn test_remote_register_stores_token_and_user() {
    let (session, api, store) = remote_session().await;

    let user = session
        .register(registration("alice@example.com", Role::Both))
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert!(session.token().unwrap().is_some());
    assert!(store.get_item(keys::USER).unwrap().is_some());

    // The stored token authenticates typed calls
    let me = api.me().await.unwrap();
    assert_eq!(me, user);

    let roles = RoleState::for_user(session.user().as_ref());
    assert_eq!(roles.available(), &[ActiveRole::Student, ActiveRole::Tutor]);
}

#[tokio::test]
async fn test_remote_errors_map_to_app_errors() {
    let (session, api, _) = remote_session().await;
    session
        .register(registration("alice@example.com", Role::Student))
        .await
        .unwrap();

    let err = session
        .register(registration("alice@example.com", Role::Student))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmailInUse));
    assert!(err.to_string().contains("already exists"));

    let err = api.get_class("class_missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "Class not found"));

    let err = session.login("alice@example.com", "nope").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_remote_validation_errors_keep_fields() {
    let (session, api, _) = remote_session().await;

    let mut form = registration("not-an-email", Role::Student);
    form.password = "short".to_string();
    form.confirm_password = "different".to_string();

    let err = api.register(&form).await.unwrap_err();
    let fields = match &err {
        AppError::Validation(errors) => AppError::field_messages(errors),
        other => panic!("unexpected error: {:?}", other),
    };
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("password"));
    assert!(fields.contains_key("confirm_password"));

    // Same error shape through the session in REST mode
    let err = session.register(form).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_remote_class_request_scenario() {
    let (session, api, _) = remote_session().await;
    let user = session
        .register(registration("alice@example.com", Role::Student))
        .await
        .unwrap();

    let request = api
        .create_class_request(&ClassRequestForm {
            subject: "mathematics".to_string(),
            topic: "Vectors".to_string(),
            level: None,
        })
        .await
        .unwrap();
    assert_eq!(request.requested_by(), &[user.id.clone()]);
    assert_eq!(request.students_requested(), 1);

    let requests = api.class_requests().await.unwrap();
    assert_eq!(requests, vec![request]);

    assert!(api.discover_classes(&[]).await.unwrap().is_empty());
    assert!(api.search_classes("vectors & more").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_logout_clears_session() {
    let (session, _, store) = remote_session().await;
    session
        .register(registration("alice@example.com", Role::Tutor))
        .await
        .unwrap();
    let mut rx = session.subscribe();

    session.logout().await.unwrap();

    assert!(!session.is_authenticated());
    assert!(store.get_item(keys::TOKEN).unwrap().is_none());
    assert!(store.get_item(keys::USER).unwrap().is_none());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn test_generic_client_against_server() {
    let (session, _, store) = remote_session().await;
    session
        .register(registration("alice@example.com", Role::Student))
        .await
        .unwrap();

    let (_, state) = common::create_test_app();
    let addr = common::spawn_server(state).await;
    let client = ApiClient::Rest(RestApi::new(format!("http://{}", addr), store));
    assert!(!client.is_mock());

    // Token from a different server instance is still valid: same test key
    let err = client.get("/api/me").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let health = client.get("/health").await.unwrap();
    assert_eq!(health["status"], "ok");
}
