// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST-mode API client.
//!
//! Issues JSON requests against a configurable base URL, authenticating with
//! the bearer token kept in the session store. There is no retry, caching or
//! pagination: each call is a single request.

use crate::db::{keys, KeyValueStore};
use crate::error::AppError;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Thin JSON client over `reqwest`.
#[derive(Clone)]
pub struct RestApi {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

/// Error body produced by the tutorhub API.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

/// Rebuild field errors from their `field -> message` wire form.
fn validation_errors(fields: &BTreeMap<String, String>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for (field, message) in fields {
        let error = ValidationError::new("invalid").with_message(Cow::Owned(message.clone()));
        // Field names arrive at runtime, so insert owned keys directly
        errors
            .0
            .insert(Cow::Owned(field.clone()), ValidationErrorsKind::Field(vec![error]));
    }
    errors
}

impl RestApi {
    /// `store` is where the session keeps its bearer token.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.send::<(), T>(Method::DELETE, path, None).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!(method = %method, url = %url, "API request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = self.store.get_item(keys::TOKEN)? {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| AppError::Upstream {
            status: 0,
            message: format!("Request to {} failed: {}", url, e),
        })?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_response(status, &body));
    }

    response.json().await.map_err(|e| AppError::Upstream {
        status: status.as_u16(),
        message: format!("JSON parse error: {}", e),
    })
}

/// Map an API error response back onto the matching [`AppError`] so callers
/// see the same errors in both modes.
fn error_from_response(status: StatusCode, body: &str) -> AppError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .map(|b| b.details.clone().unwrap_or_else(|| b.error.clone()))
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    match parsed.as_ref().map(|b| b.error.as_str()) {
        Some("validation_failed") => AppError::Validation(
            parsed
                .as_ref()
                .map(|b| validation_errors(&b.fields))
                .unwrap_or_else(ValidationErrors::new),
        ),
        Some("storage_error") => AppError::Storage(message),
        Some("internal_error") => AppError::Internal(anyhow::anyhow!(message)),
        Some("unauthorized") => AppError::Unauthorized,
        Some("invalid_token") => AppError::InvalidToken,
        Some("invalid_credentials") => AppError::InvalidCredentials,
        Some("email_in_use") => AppError::EmailInUse,
        Some("class_full") => AppError::ClassFull,
        Some("forbidden") => AppError::Forbidden(message),
        Some("not_found") => AppError::NotFound(message),
        Some("bad_request") => AppError::BadRequest(message),
        _ => AppError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}
