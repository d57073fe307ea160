// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and profile service.
//!
//! Handles registration, credential checks and the per-user student/tutor
//! profiles. Password hashes never leave this module: every operation
//! returns the public [`User`].

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::forms::{RegistrationForm, UserUpdate};
use crate::models::{StudentProfile, TutorProfile, User, UserRecord};
use chrono::Utc;
use validator::Validate;

/// Registration, login and profile storage.
#[derive(Clone)]
pub struct AuthService {
    db: Db,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(db: Db, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    // ─── Accounts ────────────────────────────────────────────────

    /// Register a new account. Rejects invalid forms and already-used emails.
    pub async fn register(&self, form: RegistrationForm) -> Result<User> {
        form.validate()?;

        let email = form.email.trim().to_string();
        if self.db.find_user_by_email(&email)?.is_some() {
            tracing::info!(email = %email, "Registration rejected: email in use");
            return Err(AppError::EmailInUse);
        }

        let cost = self.bcrypt_cost;
        let password = form.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        let user = User {
            id: format!("user_{}", uuid::Uuid::new_v4().simple()),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email,
            role: form.role,
            profile_picture: None,
        };

        self.db.insert_user(&UserRecord {
            user: user.clone(),
            password_hash,
            created_at: Utc::now(),
        })?;

        tracing::info!(user_id = %user.id, role = ?user.role, "User registered");
        Ok(user)
    }

    /// Check credentials and return the stored user without its password hash.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let Some(record) = self.db.find_user_by_email(email)? else {
            tracing::debug!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_string();
        let hash = record.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Verify task failed: {}", e)))?
            .unwrap_or(false);

        if !valid {
            tracing::debug!(user_id = %record.user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %record.user.id, "User logged in");
        Ok(record.user)
    }

    /// Sessions are stateless tokens, so there is nothing to revoke.
    pub fn logout(&self, user_id: &str) {
        tracing::info!(user_id = %user_id, "User logged out");
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.db
            .get_user(user_id)?
            .map(|r| r.user)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Apply profile edits to the user record.
    pub fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        update.validate()?;

        let mut record = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if let Some(first_name) = update.first_name {
            record.user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            record.user.last_name = last_name.trim().to_string();
        }
        if let Some(picture) = update.profile_picture {
            record.user.profile_picture = Some(picture).filter(|p| !p.is_empty());
        }

        self.db.update_user(&record)?;
        Ok(record.user)
    }

    // ─── Profiles ────────────────────────────────────────────────

    pub fn get_student_profile(&self, user_id: &str) -> Result<StudentProfile> {
        self.db
            .get_student_profile(user_id)?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    pub fn update_student_profile(
        &self,
        user_id: &str,
        mut profile: StudentProfile,
    ) -> Result<StudentProfile> {
        profile.validate()?;
        profile.user_id = user_id.to_string();
        self.db.set_student_profile(&profile)?;
        tracing::debug!(user_id = %user_id, "Student profile saved");
        Ok(profile)
    }

    pub fn get_tutor_profile(&self, user_id: &str) -> Result<TutorProfile> {
        self.db
            .get_tutor_profile(user_id)?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Save a tutor profile. Rating and review count are owned by the
    /// review flow and carried over from the stored profile.
    pub fn update_tutor_profile(
        &self,
        user_id: &str,
        mut profile: TutorProfile,
    ) -> Result<TutorProfile> {
        profile.validate()?;
        profile.user_id = user_id.to_string();

        let existing = self.db.get_tutor_profile(user_id)?;
        profile.rating = existing.as_ref().map(|p| p.rating).unwrap_or(0.0);
        profile.total_reviews = existing.map(|p| p.total_reviews).unwrap_or(0);

        self.db.set_tutor_profile(&profile)?;
        tracing::debug!(user_id = %user_id, "Tutor profile saved");
        Ok(profile)
    }
}
