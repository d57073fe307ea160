// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request bodies and their form validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::class::DEFAULT_CAPACITY;
use crate::models::user::{not_blank, EducationLevel, Role};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Editable fields of the user record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Class creation form submitted by a tutor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassForm {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    /// Subject id, e.g. `mathematics`
    #[validate(custom(function = "not_blank", message = "Subject is required"))]
    pub subject: String,
    /// Defaults to the title when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub date_time: DateTime<Utc>,
    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration: u32,
    #[serde(default = "default_capacity")]
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassRequestForm {
    /// Subject id, e.g. `mathematics`
    #[validate(custom(function = "not_blank", message = "Subject is required"))]
    pub subject: String,
    #[validate(custom(function = "not_blank", message = "Topic is required"))]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<EducationLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    #[validate(custom(function = "not_blank", message = "Tutor is required"))]
    pub tutor_id: String,
    #[serde(default)]
    pub class_id: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[validate(custom(function = "not_blank", message = "Please write a comment"))]
    pub comment: String,
}
