// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and profile models for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::class::Subject;

/// Account role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    Student,
    Tutor,
    Both,
}

impl Role {
    pub fn can_learn(self) -> bool {
        matches!(self, Role::Student | Role::Both)
    }

    pub fn can_teach(self) -> bool {
        matches!(self, Role::Tutor | Role::Both)
    }
}

/// The dashboard a user is currently acting in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveRole {
    Student,
    Tutor,
}

/// Public user profile. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Response to a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: User,
    /// Session JWT, also set as the session cookie
    pub token: String,
}

/// Stored user record (the `mockUsers` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Primary,
    Secondary,
    HighSchool,
    Undergraduate,
    Graduate,
    Postgraduate,
}

/// Student-facing profile, keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub user_id: String,
    #[validate(custom(function = "validate_about_me"))]
    pub about_me: String,
    #[validate(length(min = 1, message = "Please select at least one subject"))]
    pub subjects_interested: Vec<Subject>,
    pub education_level: EducationLevel,
    #[validate(custom(function = "not_blank", message = "Please enter your institution"))]
    pub institution: String,
}

/// Tutor-facing profile, keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TutorProfile {
    #[serde(default)]
    pub user_id: String,
    #[validate(custom(function = "validate_about_me"))]
    pub about_me: String,
    #[validate(length(min = 1, message = "Please select at least one teaching level"))]
    pub teaching_level: Vec<EducationLevel>,
    #[validate(custom(
        function = "has_complete_experience",
        message = "Please add at least one complete experience"
    ))]
    pub experiences: Vec<Experience>,
    #[validate(custom(
        function = "has_complete_education",
        message = "Please add at least one complete education entry"
    ))]
    pub education: Vec<Education>,
    #[validate(length(min = 1, message = "Please select at least one subject"))]
    pub subjects_teaching: Vec<Subject>,
    #[validate(custom(
        function = "not_blank",
        message = "Please enter your current institution"
    ))]
    pub current_institution: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub institution: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
}

impl Experience {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.institution.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub field: String,
    pub year: i32,
}

impl Education {
    fn is_complete(&self) -> bool {
        !self.degree.trim().is_empty()
            && !self.institution.trim().is_empty()
            && !self.field.trim().is_empty()
    }
}

const ABOUT_ME_MAX_CHARS: usize = 500;

/// Reject empty or whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn validate_about_me(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Please tell us about yourself".into());
        return Err(err);
    }
    if value.chars().count() > ABOUT_ME_MAX_CHARS {
        let mut err = ValidationError::new("length");
        err.message = Some("About me should be less than 500 characters".into());
        return Err(err);
    }
    Ok(())
}

fn has_complete_experience(experiences: &[Experience]) -> Result<(), ValidationError> {
    if experiences.iter().any(Experience::is_complete) {
        Ok(())
    } else {
        Err(ValidationError::new("incomplete"))
    }
}

fn has_complete_education(education: &[Education]) -> Result<(), ValidationError> {
    if education.iter().any(Education::is_complete) {
        Ok(())
    } else {
        Err(ValidationError::new("incomplete"))
    }
}
