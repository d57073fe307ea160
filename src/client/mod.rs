// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API clients for the two data-access modes.
//!
//! - [`LocalApi`]: mock mode, everything lives in a [`KeyValueStore`]
//! - [`RestApi`]: REST mode, JSON over HTTP with a bearer token
//!
//! [`ApiClient`] selects one at startup and exposes the shared four verbs.
//!
//! [`KeyValueStore`]: crate::db::KeyValueStore

pub mod local;
pub mod rest;
pub mod tutor;

pub use local::LocalApi;
pub use rest::RestApi;
pub use tutor::TutorApi;

use crate::error::AppError;
use serde_json::Value;

#[derive(Clone)]
pub enum ApiClient {
    Local(LocalApi),
    Rest(RestApi),
}

impl ApiClient {
    pub fn is_mock(&self) -> bool {
        matches!(self, ApiClient::Local(_))
    }

    pub async fn get(&self, path: &str) -> Result<Value, AppError> {
        match self {
            ApiClient::Local(api) => api.get(path).await,
            ApiClient::Rest(api) => api.get(path).await,
        }
    }

    pub async fn post(&self, path: &str, data: Value) -> Result<Value, AppError> {
        match self {
            ApiClient::Local(api) => api.post(path, data).await,
            ApiClient::Rest(api) => api.post(path, &data).await,
        }
    }

    pub async fn put(&self, path: &str, data: Value) -> Result<Value, AppError> {
        match self {
            ApiClient::Local(api) => api.put(path, data).await,
            ApiClient::Rest(api) => api.put(path, &data).await,
        }
    }

    pub async fn delete(&self, path: &str) -> Result<Value, AppError> {
        match self {
            ApiClient::Local(api) => api.delete(path).await,
            ApiClient::Rest(api) => api.delete(path).await,
        }
    }
}
