//! Signup and login flows on top of the credential store

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    models::{Credentials, NewUser, User},
    repositories::UserRepository,
    validation::validate_credentials,
};

/// Reasons a signup or login is refused
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(String),

    #[error("Username already taken.")]
    UsernameTaken,

    #[error("User not found.")]
    UserNotFound,

    #[error("Incorrect password.")]
    IncorrectPassword,

    /// Storage or hashing failure, not caused by the caller
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Account service
#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
}

impl AccountService {
    /// Create a new account service
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Register a new user
    pub async fn signup(&self, credentials: Credentials) -> Result<User, AccountError> {
        validate_credentials(&credentials.username, &credentials.password)
            .map_err(AccountError::Invalid)?;

        let new_user = NewUser::from(credentials);
        match self.users.create(&new_user).await {
            Ok(user) => {
                info!("User {} signed up with id {}", user.username, user.id);
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                warn!("Signup refused, username {} is taken", new_user.username);
                Err(AccountError::UsernameTaken)
            }
            Err(e) => Err(AccountError::Storage(e)),
        }
    }

    /// Check credentials and return the matching user
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AccountError> {
        info!("Login attempt for user: {}", credentials.username);

        let user = self
            .users
            .find_by_username(&credentials.username)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if !self.users.verify_password(&user, &credentials.password)? {
            warn!("Incorrect password for user: {}", credentials.username);
            return Err(AccountError::IncorrectPassword);
        }

        Ok(user)
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}
