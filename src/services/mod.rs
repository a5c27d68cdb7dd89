pub mod resource_service;
pub mod user_service;
pub mod validation;

pub use resource_service::{CreateResourceRequest, ResourceService};
pub use user_service::{
    CreateUserRequest, NewAccount, TokenRequest, UpdateProfileRequest, UserService,
};

use std::collections::HashMap;
use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::database::DatabaseError;
use validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid input")]
    Validation(HashMap<String, String>),

    /// Token exchange failure; deliberately the same for every cause
    #[error("Unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors.into_inner())
    }
}

/// Ok when nothing was collected, otherwise a validation error
fn ensure_valid(errors: FieldErrors) -> Result<(), ServiceError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}
