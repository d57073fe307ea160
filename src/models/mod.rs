// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod class;
pub mod forms;
pub mod review;
pub mod user;

pub use class::{Class, ClassRequest, ClassStatus, Subject, TutorSummary};
pub use review::Review;
pub use user::{ActiveRole, AuthResponse, EducationLevel, Role, StudentProfile, TutorProfile, User, UserRecord};
