//! Authentication module.
//!
//! Provides account registration, password checking, and token-based
//! sessions. Accounts live in the database; session tokens are held in
//! memory and expire after 24 hours.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use parking_lot::RwLock;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::entities::user;
use crate::error::{Result, ServerError};

/// Hash a password with salt
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"review-server-salt:");
    hasher.update(password.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Generate an opaque session token
fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    let result = hasher.finalize();
    BASE64.encode(&result[..24])
}

/// A session token
#[derive(Clone, Debug)]
pub struct Token {
    pub token: String,
    pub username: String,
    pub expires_at: SystemTime,
}

impl Token {
    fn new(username: String, duration: Duration) -> Self {
        Self {
            token: generate_token(),
            username,
            expires_at: SystemTime::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.expires_at
    }
}

/// Authentication manager
pub struct AuthManager {
    db: DatabaseConnection,
    tokens: RwLock<HashMap<String, Token>>,
    token_duration: Duration,
}

impl AuthManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            tokens: RwLock::new(HashMap::new()),
            token_duration: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Create the bootstrap admin account if no account with that name exists
    pub async fn ensure_admin_user(&self, username: &str, password: &str) -> Result<()> {
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(hash_password(password)),
            email: Set(None),
            is_admin: Set(true),
            created_on: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!("Created bootstrap admin account '{}'", username);
        Ok(())
    }

    /// Register a new account
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<user::Model> {
        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(ServerError::InvalidRequest(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let created = user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(hash_password(password)),
            email: Set(email.map(|e| e.to_string())),
            is_admin: Set(false),
            created_on: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(created)
    }

    /// Authenticate with username/password, returns a session token
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Token> {
        let account = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or(ServerError::AuthFailed)?;

        if hash_password(password) != account.password_hash {
            return Err(ServerError::AuthFailed);
        }

        let token = Token::new(account.username, self.token_duration);
        self.tokens
            .write()
            .insert(token.token.clone(), token.clone());

        Ok(token)
    }

    /// Resolve a session token to its account, if still valid
    pub async fn user_for_token(&self, token_str: &str) -> Option<user::Model> {
        let username = {
            let tokens = self.tokens.read();
            let token = tokens.get(token_str)?;
            if token.is_expired() {
                return None;
            }
            token.username.clone()
        };

        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .ok()
            .flatten()
    }

    /// Revoke a session token
    pub fn revoke_token(&self, token_str: &str) {
        self.tokens.write().remove(token_str);
    }

    /// Drop expired session tokens
    pub fn cleanup_expired_tokens(&self) {
        self.tokens.write().retain(|_, t| !t.is_expired());
    }
}
