use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use lectio_core::model::UserId;
use lectio_core::time::Clock;
use storage::repository::{NewUserRecord, StorageError, UserRepository};

use crate::error::AuthError;

const MIN_PASSWORD_LEN: usize = 8;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Opaque handle for a signed-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A signed-in reader.
///
/// Callers pass the identity from this value explicitly into the recorder
/// and aggregator operations; nothing in the tracker reads an ambient
/// current-user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub email: String,
}

//
// ─── PASSWORD HASHING ──────────────────────────────────────────────────────────
//

/// Hash a password with Argon2id, returning the PHC-formatted string that
/// embeds the salt and parameters.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// The authentication collaborator: account creation, sign-in/out, and
/// session lookup. Sessions live only in this process; the account store is
/// the injected repository.
pub struct AuthService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self {
            clock,
            users,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new reader account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `PasswordTooShort` on bad input,
    /// `AuthError::EmailTaken` when the address is already registered, and
    /// storage errors otherwise.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        let id = UserId::generate();
        let record = NewUserRecord::new(id, email, hash_password(password)?, self.clock.now());
        match self.users.insert_user(record).await {
            Ok(()) => {
                info!(user = %id, "account created");
                Ok(id)
            }
            Err(StorageError::Conflict) => Err(AuthError::EmailTaken),
            Err(err) => {
                warn!(error = %err, "account creation failed");
                Err(err.into())
            }
        }
    }

    /// Signs a reader in and opens a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password, without distinguishing the two.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let record = self
            .users
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: SessionToken::generate(),
            user_id: record.id,
            email: record.email,
        };
        match self.sessions.write() {
            Ok(mut sessions) => {
                sessions.insert(session.token, session.clone());
            }
            Err(err) => {
                warn!(error = %err, "session store unavailable");
                return Err(AuthError::SessionStore(err.to_string()));
            }
        }
        info!(user = %session.user_id, "signed in");
        Ok(session)
    }

    /// The session behind a token, or `None` when the token is unknown or
    /// the session has been closed.
    #[must_use]
    pub fn current_user(&self, token: &SessionToken) -> Option<Session> {
        match self.sessions.read() {
            Ok(sessions) => sessions.get(token).cloned(),
            Err(err) => {
                warn!(error = %err, "session store unavailable");
                None
            }
        }
    }

    /// Closes the session; unknown tokens are a no-op.
    pub fn sign_out(&self, token: &SessionToken) {
        if let Ok(mut sessions) = self.sessions.write() {
            if let Some(session) = sessions.remove(token) {
                info!(user = %session.user_id, "signed out");
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn invalid_hash_format_is_an_error() {
        assert!(verify_password("password", "not-a-valid-hash").is_err());
    }
}
