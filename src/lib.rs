// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tutorhub: data access and session state for a tutoring marketplace
//!
//! This crate provides the storage layer, the account/class services, the
//! client-side session and role state, and the HTTP API that REST-mode
//! clients talk to.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::{Db, FileStore, KeyValueStore, MemoryStore};
use services::{AuthService, ClassService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub auth_service: AuthService,
    pub class_service: ClassService,
}

impl AppState {
    /// Build state over the store selected by `config.data_dir`.
    pub fn new(config: Config) -> error::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => Arc::new(FileStore::open(dir)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::with_db(config, Db::new(store)))
    }

    pub fn with_db(config: Config, db: Db) -> Self {
        let auth_service = AuthService::new(db.clone(), config.bcrypt_cost);
        let class_service = ClassService::new(db.clone());
        Self {
            config,
            db,
            auth_service,
            class_service,
        }
    }
}
