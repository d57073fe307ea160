// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed repository over a [`KeyValueStore`].
//!
//! Provides high-level operations for:
//! - Users (registered accounts with password hashes)
//! - Classes (upcoming and discover collections)
//! - Class requests
//! - Student and tutor profiles (one key per user)
//! - Reviews
//!
//! Collections are read and written whole, so concurrent writers to the
//! same collection are last-write-wins.

use crate::db::keys;
use crate::db::store::{KeyValueStore, MemoryStore};
use crate::error::AppError;
use crate::models::{Class, ClassRequest, Review, StudentProfile, TutorProfile, UserRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Repository handle. Cheap to clone.
#[derive(Clone)]
pub struct Db {
    store: Arc<dyn KeyValueStore>,
}

impl Db {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The underlying store, for session state that lives next to the data.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    // ─── Generic JSON helpers ────────────────────────────────────

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.store.get_item(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::Storage(format!("Malformed value at {}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Storage(format!("Failed to encode {}: {}", key, e)))?;
        self.store.set_item(key, &raw)
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, AppError> {
        Ok(self.read(key)?.unwrap_or_default())
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        self.read_list(keys::USERS)
    }

    /// Find a user by email, ignoring case and surrounding whitespace.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let needle = normalize_email(email);
        Ok(self
            .list_users()?
            .into_iter()
            .find(|u| normalize_email(&u.user.email) == needle))
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self
            .list_users()?
            .into_iter()
            .find(|u| u.user.id == user_id))
    }

    /// Append a new user. Fails with `EmailInUse` on a duplicate email.
    pub fn insert_user(&self, record: &UserRecord) -> Result<(), AppError> {
        let mut users = self.list_users()?;
        let email = normalize_email(&record.user.email);
        if users.iter().any(|u| normalize_email(&u.user.email) == email) {
            return Err(AppError::EmailInUse);
        }
        users.push(record.clone());
        self.write(keys::USERS, &users)
    }

    /// Replace an existing user record (matched by id).
    pub fn update_user(&self, record: &UserRecord) -> Result<(), AppError> {
        let mut users = self.list_users()?;
        let slot = users
            .iter_mut()
            .find(|u| u.user.id == record.user.id)
            .ok_or_else(|| AppError::NotFound(format!("User {}", record.user.id)))?;
        *slot = record.clone();
        self.write(keys::USERS, &users)
    }

    // ─── Class Operations ────────────────────────────────────────

    pub fn upcoming_classes(&self) -> Result<Vec<Class>, AppError> {
        self.read_list(keys::UPCOMING_CLASSES)
    }

    pub fn set_upcoming_classes(&self, classes: &[Class]) -> Result<(), AppError> {
        self.write(keys::UPCOMING_CLASSES, classes)
    }

    pub fn discover_classes(&self) -> Result<Vec<Class>, AppError> {
        self.read_list(keys::DISCOVER_CLASSES)
    }

    pub fn set_discover_classes(&self, classes: &[Class]) -> Result<(), AppError> {
        self.write(keys::DISCOVER_CLASSES, classes)
    }

    // ─── Class Request Operations ────────────────────────────────

    pub fn class_requests(&self) -> Result<Vec<ClassRequest>, AppError> {
        self.read_list(keys::CLASS_REQUESTS)
    }

    pub fn set_class_requests(&self, requests: &[ClassRequest]) -> Result<(), AppError> {
        self.write(keys::CLASS_REQUESTS, requests)
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub fn get_student_profile(&self, user_id: &str) -> Result<Option<StudentProfile>, AppError> {
        self.read(&keys::student_profile(user_id))
    }

    pub fn set_student_profile(&self, profile: &StudentProfile) -> Result<(), AppError> {
        self.write(&keys::student_profile(&profile.user_id), profile)
    }

    pub fn get_tutor_profile(&self, user_id: &str) -> Result<Option<TutorProfile>, AppError> {
        self.read(&keys::tutor_profile(user_id))
    }

    pub fn set_tutor_profile(&self, profile: &TutorProfile) -> Result<(), AppError> {
        self.write(&keys::tutor_profile(&profile.user_id), profile)
    }

    // ─── Review Operations ───────────────────────────────────────

    pub fn reviews(&self) -> Result<Vec<Review>, AppError> {
        self.read_list(keys::REVIEWS)
    }

    pub fn set_reviews(&self, reviews: &[Review]) -> Result<(), AppError> {
        self.write(keys::REVIEWS, reviews)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};

    fn record(id: &str, email: &str) -> UserRecord {
        UserRecord {
            user: User {
                id: id.to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: email.to_string(),
                role: Role::Student,
                profile_picture: None,
            },
            password_hash: "hash".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_missing_collections_read_empty() {
        let db = Db::in_memory();
        assert!(db.list_users().unwrap().is_empty());
        assert!(db.upcoming_classes().unwrap().is_empty());
        assert!(db.class_requests().unwrap().is_empty());
        assert!(db.get_student_profile("nobody").unwrap().is_none());
    }

    #[test]
    fn test_insert_user_rejects_duplicate_email() {
        let db = Db::in_memory();
        db.insert_user(&record("u1", "Student@Example.com")).unwrap();

        let err = db.insert_user(&record("u2", " student@example.com ")).unwrap_err();
        assert!(matches!(err, AppError::EmailInUse));
        assert_eq!(db.list_users().unwrap().len(), 1);

        let found = db.find_user_by_email("STUDENT@example.com").unwrap().unwrap();
        assert_eq!(found.user.id, "u1");
    }

    #[test]
    fn test_update_missing_user() {
        let db = Db::in_memory();
        let err = db.update_user(&record("ghost", "ghost@example.com")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_malformed_value_is_storage_error() {
        let db = Db::in_memory();
        db.store().set_item(keys::UPCOMING_CLASSES, "not json").unwrap();
        assert!(matches!(
            db.upcoming_classes(),
            Err(AppError::Storage(_))
        ));
    }
}
