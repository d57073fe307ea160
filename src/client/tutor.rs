// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed calls against the tutorhub HTTP API.

use crate::client::rest::RestApi;
use crate::error::AppError;
use crate::models::forms::{
    ClassForm, ClassRequestForm, LoginForm, RegistrationForm, ReviewForm, UserUpdate,
};
use crate::models::{
    AuthResponse, Class, ClassRequest, Review, StudentProfile, TutorProfile, User,
};
use serde_json::{json, Value};
use urlencoding::encode;

#[derive(Clone)]
pub struct TutorApi {
    rest: RestApi,
}

impl TutorApi {
    pub fn new(rest: RestApi) -> Self {
        Self { rest }
    }

    pub fn rest(&self) -> &RestApi {
        &self.rest
    }

    // ─── Auth ────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let form = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.rest.post("/auth/login", &form).await
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<AuthResponse, AppError> {
        self.rest.post("/auth/register", form).await
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let _: Value = self.rest.post("/auth/logout", &json!({})).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<User, AppError> {
        self.rest.get("/api/me").await
    }

    pub async fn update_me(&self, update: &UserUpdate) -> Result<User, AppError> {
        self.rest.put("/api/me", update).await
    }

    // ─── Classes ─────────────────────────────────────────────────

    pub async fn upcoming_classes(&self) -> Result<Vec<Class>, AppError> {
        self.rest.get("/classes/upcoming").await
    }

    pub async fn get_class(&self, class_id: &str) -> Result<Class, AppError> {
        self.rest
            .get(&format!("/classes/{}", encode(class_id)))
            .await
    }

    pub async fn create_class(&self, form: &ClassForm) -> Result<Class, AppError> {
        self.rest.post("/classes", form).await
    }

    pub async fn enroll(&self, class_id: &str) -> Result<Class, AppError> {
        self.rest
            .post(&format!("/classes/{}/enroll", encode(class_id)), &json!({}))
            .await
    }

    /// Discover classes, optionally limited to the given subject ids.
    pub async fn discover_classes(&self, subjects: &[String]) -> Result<Vec<Class>, AppError> {
        if subjects.is_empty() {
            return self.rest.get("/classes/discover").await;
        }
        let filter = subjects.join(",");
        self.rest
            .get(&format!("/classes/discover?subjects={}", encode(&filter)))
            .await
    }

    pub async fn search_classes(&self, query: &str) -> Result<Vec<Class>, AppError> {
        self.rest
            .get(&format!("/classes/search?q={}", encode(query)))
            .await
    }

    // ─── Class Requests ──────────────────────────────────────────

    pub async fn class_requests(&self) -> Result<Vec<ClassRequest>, AppError> {
        self.rest.get("/class-requests").await
    }

    pub async fn create_class_request(
        &self,
        form: &ClassRequestForm,
    ) -> Result<ClassRequest, AppError> {
        self.rest.post("/class-requests", form).await
    }

    pub async fn request_class(&self, request_id: &str) -> Result<ClassRequest, AppError> {
        self.rest
            .post(
                &format!("/class-requests/{}/request", encode(request_id)),
                &json!({}),
            )
            .await
    }

    // ─── Profiles ────────────────────────────────────────────────

    pub async fn get_student_profile(&self, user_id: &str) -> Result<StudentProfile, AppError> {
        self.rest
            .get(&format!("/profiles/student/{}", encode(user_id)))
            .await
    }

    pub async fn update_student_profile(
        &self,
        user_id: &str,
        profile: &StudentProfile,
    ) -> Result<StudentProfile, AppError> {
        self.rest
            .put(&format!("/profiles/student/{}", encode(user_id)), profile)
            .await
    }

    pub async fn get_tutor_profile(&self, user_id: &str) -> Result<TutorProfile, AppError> {
        self.rest
            .get(&format!("/profiles/tutor/{}", encode(user_id)))
            .await
    }

    pub async fn update_tutor_profile(
        &self,
        user_id: &str,
        profile: &TutorProfile,
    ) -> Result<TutorProfile, AppError> {
        self.rest
            .put(&format!("/profiles/tutor/{}", encode(user_id)), profile)
            .await
    }

    // ─── Reviews ─────────────────────────────────────────────────

    pub async fn tutor_reviews(&self, tutor_id: &str) -> Result<Vec<Review>, AppError> {
        self.rest
            .get(&format!("/tutors/{}/reviews", encode(tutor_id)))
            .await
    }

    pub async fn create_review(&self, form: &ReviewForm) -> Result<Review, AppError> {
        self.rest.post("/reviews", form).await
    }
}
