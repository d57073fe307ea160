// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod classes;
pub mod session;

pub use auth::AuthService;
pub use classes::ClassService;
pub use session::{AuthBackend, AuthSession, RoleState, RouteAccess};
