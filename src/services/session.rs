// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side session and role state.
//!
//! [`AuthSession`] holds the signed-in user, persists it under the `user`
//! key and publishes every change on a watch channel. [`RoleState`] tracks
//! which dashboard a signed-in user is acting in.

use crate::client::TutorApi;
use crate::db::{keys, KeyValueStore};
use crate::error::{AppError, Result};
use crate::models::forms::RegistrationForm;
use crate::models::{ActiveRole, Role, User};
use crate::services::auth::AuthService;
use std::sync::Arc;
use tokio::sync::watch;

/// Where credentials are checked.
#[derive(Clone)]
pub enum AuthBackend {
    /// Mock mode: accounts live in the same store as the session.
    Local(AuthService),
    /// REST mode: the API issues a bearer token.
    Remote(TutorApi),
}

pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
    backend: AuthBackend,
    user_tx: watch::Sender<Option<User>>,
}

impl AuthSession {
    /// Create a signed-out session. Call [`AuthSession::restore`] to pick up
    /// a previously persisted user.
    pub fn new(store: Arc<dyn KeyValueStore>, backend: AuthBackend) -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            store,
            backend,
            user_tx,
        }
    }

    /// Load the persisted user, if any. Unreadable session data is dropped
    /// and the session starts signed out.
    pub fn restore(&self) -> Option<User> {
        let user = match self.store.get_item(keys::USER) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to restore auth state");
                    self.forget();
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth state");
                None
            }
        };

        if let Some(user) = &user {
            tracing::debug!(user_id = %user.id, "Session restored");
        }
        self.user_tx.send_replace(user.clone());
        user
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let (user, token) = match &self.backend {
            AuthBackend::Local(auth) => (auth.login(email, password).await?, None),
            AuthBackend::Remote(api) => {
                let response = api.login(email, password).await?;
                (response.user, Some(response.token))
            }
        };
        self.sign_in(user, token)
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<User> {
        let (user, token) = match &self.backend {
            AuthBackend::Local(auth) => (auth.register(form).await?, None),
            AuthBackend::Remote(api) => {
                let response = api.register(&form).await?;
                (response.user, Some(response.token))
            }
        };
        self.sign_in(user, token)
    }

    /// Sign out. A backend failure leaves the session signed in.
    pub async fn logout(&self) -> Result<()> {
        match &self.backend {
            AuthBackend::Local(auth) => {
                if let Some(user) = self.user() {
                    auth.logout(&user.id);
                }
            }
            AuthBackend::Remote(api) => api.logout().await?,
        }

        self.store.remove_item(keys::USER)?;
        self.store.remove_item(keys::TOKEN)?;
        self.user_tx.send_replace(None);
        Ok(())
    }

    /// Replace the cached user after a profile edit.
    pub fn set_user(&self, user: User) -> Result<()> {
        self.persist_user(&user)?;
        self.user_tx.send_replace(Some(user));
        Ok(())
    }

    pub fn user(&self) -> Option<User> {
        self.user_tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_tx.borrow().is_some()
    }

    /// Bearer token, present only in REST mode.
    pub fn token(&self) -> Result<Option<String>> {
        self.store.get_item(keys::TOKEN)
    }

    /// Receiver that observes every sign-in, sign-out and user edit.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user_tx.subscribe()
    }

    fn sign_in(&self, user: User, token: Option<String>) -> Result<User> {
        self.persist_user(&user)?;
        match token {
            Some(token) => self.store.set_item(keys::TOKEN, &token)?,
            None => self.store.remove_item(keys::TOKEN)?,
        }
        self.user_tx.send_replace(Some(user.clone()));
        tracing::debug!(user_id = %user.id, "Session started");
        Ok(user)
    }

    fn persist_user(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)
            .map_err(|e| AppError::Storage(format!("Failed to encode user: {}", e)))?;
        self.store.set_item(keys::USER, &raw)
    }

    fn forget(&self) {
        for key in [keys::USER, keys::TOKEN] {
            if let Err(e) = self.store.remove_item(key) {
                tracing::warn!(key = key, error = %e, "Failed to clear session key");
            }
        }
    }
}

/// Outcome of guarding a page on authentication and active role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

/// Available and active dashboard roles for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleState {
    available: Vec<ActiveRole>,
    active: ActiveRole,
}

impl Default for RoleState {
    fn default() -> Self {
        Self {
            available: vec![ActiveRole::Student],
            active: ActiveRole::Student,
        }
    }
}

impl RoleState {
    pub fn for_user(user: Option<&User>) -> Self {
        let mut state = Self::default();
        state.sync_user(user);
        state
    }

    /// Dashboards open to an account role, student first.
    pub fn available_roles(role: Option<Role>) -> Vec<ActiveRole> {
        let Some(role) = role else {
            return vec![ActiveRole::Student];
        };
        let mut roles = Vec::with_capacity(2);
        if role.can_learn() {
            roles.push(ActiveRole::Student);
        }
        if role.can_teach() {
            roles.push(ActiveRole::Tutor);
        }
        roles
    }

    /// Recompute the available roles, falling back to the first one when
    /// the active role is no longer allowed.
    pub fn sync_user(&mut self, user: Option<&User>) {
        self.available = Self::available_roles(user.map(|u| u.role));
        if !self.available.contains(&self.active) {
            if let Some(first) = self.available.first() {
                self.active = *first;
            }
        }
    }

    pub fn set_active_role(&mut self, role: ActiveRole) -> Result<()> {
        if !self.available.contains(&role) {
            return Err(AppError::Forbidden(format!(
                "Role {:?} is not available for this account",
                role
            )));
        }
        self.active = role;
        Ok(())
    }

    pub fn active_role(&self) -> ActiveRole {
        self.active
    }

    pub fn available(&self) -> &[ActiveRole] {
        &self.available
    }

    /// The dashboard shown at `/home`.
    pub fn home(&self) -> ActiveRole {
        self.active
    }

    pub fn can_switch(&self) -> bool {
        self.available.len() > 1
    }

    /// Guard for a protected page that may require a specific role.
    pub fn check_access(&self, authenticated: bool, required: Option<ActiveRole>) -> RouteAccess {
        if !authenticated {
            return RouteAccess::RedirectToLogin;
        }
        match required {
            Some(role) if role != self.active => RouteAccess::RedirectToHome,
            _ => RouteAccess::Allow,
        }
    }
}
