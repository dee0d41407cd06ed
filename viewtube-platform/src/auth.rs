use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Database, DatabaseError, DatabaseResult, NewUser, PrimaryKey, UserData};

pub struct Auth {
    db: Arc<dyn Database>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is incorrect. The message is identical for both
    /// cases so accounts can't be enumerated.
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Email already registered. Please login instead.")]
    EmailTaken,
    /// A registration field failed validation
    #[error("{0}")]
    Validation(&'static str),
    /// The bearer token is missing, malformed, or expired
    #[error("Not authorized, token failed.")]
    BadToken,
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
    #[error("HashError: {0}")]
    Hash(String),
    #[error("TokenError: {0}")]
    Token(String),
}

/// The signed payload embedded in a bearer token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: PrimaryKey,
    exp: usize,
}

impl Auth {
    const TOKEN_DURATION_IN_DAYS: usize = 7;
    const HASH_COST: u32 = 10;

    pub fn new(db: &Arc<dyn Database>, secret: &str) -> Self {
        Self {
            db: db.clone(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Creates a new account. Does not log the user in.
    pub async fn register(&self, new_user: NewRegistration) -> Result<UserData, AuthError> {
        // Characters, not bytes, so multibyte names are measured fairly
        if new_user.username.chars().count() < 3 {
            return Err(AuthError::Validation(
                "Username is required and must be at least 3 characters.",
            ));
        }

        if !new_user.email.contains('@') {
            return Err(AuthError::Validation("Valid email is required."));
        }

        if new_user.password.len() < 6 {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters long.",
            ));
        }

        self.db
            .user_by_email(&new_user.email)
            .await
            .conflict_or_ok("User", "email", &new_user.email)
            .map_err(|e| match e {
                DatabaseError::Conflict { .. } => AuthError::EmailTaken,
                err => AuthError::Db(err),
            })?;

        let hashed_password = bcrypt::hash(&new_user.password, Self::HASH_COST)
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        self.db
            .create_user(NewUser {
                username: new_user.username,
                email: new_user.email,
                password: hashed_password,
                avatar: new_user.avatar.unwrap_or_default(),
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict { .. } => AuthError::EmailTaken,
                err => AuthError::Db(err),
            })
    }

    /// Logs in a user, returning a signed token and the user it belongs to
    pub async fn login(&self, credentials: Credentials) -> Result<LoginData, AuthError> {
        let user = self
            .db
            .user_by_email(&credentials.email)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => AuthError::InvalidCredentials,
                err => AuthError::Db(err),
            })?;

        let matches = bcrypt::verify(&credentials.password, &user.password)
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let expires_at = Utc::now() + Duration::days(Self::TOKEN_DURATION_IN_DAYS as i64);

        let claims = Claims {
            id: user.id,
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(LoginData { token, user })
    }

    /// Resolves a bearer token into the user it was issued for
    pub async fn verify(&self, token: &str) -> Result<UserData, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AuthError::BadToken)?
            .claims;

        self.db.user_by_id(claims.id).await.map_err(|e| match e {
            DatabaseError::NotFound { .. } => AuthError::BadToken,
            err => AuthError::Db(err),
        })
    }
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

/// The result of a successful login
#[derive(Debug)]
pub struct LoginData {
    pub token: String,
    pub user: UserData,
}
