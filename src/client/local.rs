// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mock-mode API client backed by key-value storage.
//!
//! Every path maps to the storage key named by its last segment, so
//! `/api/classRequests` and `classRequests` address the same value.

use crate::db::KeyValueStore;
use crate::error::AppError;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Local-storage API client with an optional artificial delay.
#[derive(Clone)]
pub struct LocalApi {
    store: Arc<dyn KeyValueStore>,
    latency: Duration,
}

impl LocalApi {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency` to imitate a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_network(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Stored value, or `{"data": []}` when the key is absent.
    pub async fn get(&self, path: &str) -> Result<Value, AppError> {
        self.simulate_network().await;
        let key = key_for(path);
        match self.store.get_item(key)? {
            Some(raw) => parse(key, &raw),
            None => Ok(json!({ "data": [] })),
        }
    }

    /// Append to a stored array, merge into a stored object, or start a
    /// new collection. Returns the body, with any assigned id.
    pub async fn post(&self, path: &str, mut data: Value) -> Result<Value, AppError> {
        self.simulate_network().await;
        let key = key_for(path);

        let new_value = match self.store.get_item(key)? {
            Some(raw) => match parse(key, &raw)? {
                Value::Array(mut items) => {
                    assign_id(key, &mut data);
                    items.push(data.clone());
                    Value::Array(items)
                }
                Value::Object(existing) => merge(existing, &data),
                _ => {
                    return Err(AppError::BadRequest(format!(
                        "Value at {} is neither a list nor an object",
                        key
                    )))
                }
            },
            None if data.is_array() => data.clone(),
            None => {
                assign_id(key, &mut data);
                Value::Array(vec![data.clone()])
            }
        };

        self.store.set_item(key, &new_value.to_string())?;
        Ok(data)
    }

    /// Overwrite the stored value.
    pub async fn put(&self, path: &str, data: Value) -> Result<Value, AppError> {
        self.simulate_network().await;
        self.store.set_item(key_for(path), &data.to_string())?;
        Ok(data)
    }

    pub async fn delete(&self, path: &str) -> Result<Value, AppError> {
        self.simulate_network().await;
        self.store.remove_item(key_for(path))?;
        Ok(json!({ "success": true }))
    }
}

fn key_for(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

fn parse(key: &str, raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Storage(format!("Malformed value at {}: {}", key, e)))
}

/// Give an object body an `id` of `<key>_<millis>` unless it has one.
fn assign_id(key: &str, data: &mut Value) {
    if let Value::Object(fields) = data {
        let has_id = fields
            .get("id")
            .map(|id| !id.is_null() && id.as_str() != Some(""))
            .unwrap_or(false);
        if !has_id {
            let millis = chrono::Utc::now().timestamp_millis();
            fields.insert("id".to_string(), json!(format!("{}_{}", key, millis)));
        }
    }
}

/// Shallow merge of `data`'s fields over `existing`.
fn merge(mut existing: Map<String, Value>, data: &Value) -> Value {
    if let Value::Object(fields) = data {
        for (k, v) in fields {
            existing.insert(k.clone(), v.clone());
        }
    }
    Value::Object(existing)
}
