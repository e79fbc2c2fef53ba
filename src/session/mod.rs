//! Mock account handling over a key-value session store.
//!
//! Accounts live under `account:<email>` and the signed-in user under
//! [`CURRENT_USER_KEY`]. The session object is passed explicitly to whatever
//! needs it; there is no ambient global user.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::forms::is_valid_email;

pub const CURRENT_USER_KEY: &str = "kwaground_current_user";
pub const MIN_PASSWORD_LEN: usize = 6;
pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const SIGNUP_SUCCESS: &str = "Account created successfully!";

/// Mock account. The password is kept as entered; this store is not a credential vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// External key-value storage, e.g. device local storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<User>, SessionStoreError>;
    fn put(&self, key: &str, user: User) -> Result<(), SessionStoreError>;
    fn delete(&self, key: &str) -> Result<(), SessionStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("An account with this email already exists.")]
    DuplicateAccount,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<String, User>>>,
}

impl InMemorySessionStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, User>>, SessionStoreError> {
        self.entries
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session mutex poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<User>, SessionStoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, user: User) -> Result<(), SessionStoreError> {
        self.lock()?.insert(key.to_string(), user);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> String {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("user-{id:06}")
}

fn account_key(email: &str) -> String {
    format!("account:{}", email.trim())
}

/// Sign-in state over a [`SessionStore`].
pub struct Session<S> {
    store: Arc<S>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn current_user(&self) -> Result<Option<User>, SessionError> {
        Ok(self.store.get(CURRENT_USER_KEY)?)
    }

    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.current_user()?.is_some())
    }

    /// Create an account and sign it in.
    pub fn signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, SessionError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(SessionError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::PasswordTooShort);
        }
        if password != confirm_password {
            return Err(SessionError::PasswordMismatch);
        }

        let key = account_key(email);
        if self.store.get(&key)?.is_some() {
            return Err(SessionError::DuplicateAccount);
        }

        let user = User {
            id: next_user_id(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };
        self.store.put(&key, user.clone())?;
        self.store.put(CURRENT_USER_KEY, user.clone())?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let user = self
            .store
            .get(&account_key(email))?
            .filter(|user| user.password == password)
            .ok_or(SessionError::InvalidCredentials)?;

        self.store.put(CURRENT_USER_KEY, user.clone())?;
        debug!(user_id = %user.id, "signed in");
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.delete(CURRENT_USER_KEY)?;
        Ok(())
    }
}
