// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (key-value storage).

pub mod repository;
pub mod store;

pub use repository::Db;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Storage key names as constants.
pub mod keys {
    /// Classes the tutor created; enrollment happens here
    pub const UPCOMING_CLASSES: &str = "upcomingClasses";
    /// Catalog of classes offered for discovery
    pub const DISCOVER_CLASSES: &str = "discoverClasses";
    pub const CLASS_REQUESTS: &str = "classRequests";
    pub const USERS: &str = "mockUsers";
    pub const REVIEWS: &str = "reviews";
    /// Session: bearer token (REST mode only)
    pub const TOKEN: &str = "token";
    /// Session: the signed-in user
    pub const USER: &str = "user";

    pub fn student_profile(user_id: &str) -> String {
        format!("studentProfile_{}", user_id)
    }

    pub fn tutor_profile(user_id: &str) -> String {
        format!("tutorProfile_{}", user_id)
    }
}
