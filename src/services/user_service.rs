use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::validation::{self, FieldErrors};
use super::{ensure_valid, ServiceError};
use crate::auth::password::{hash_password, verify_password_or_dummy};
use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::models::{NewUser, User, UserChanges, UserProfile};
use crate::database::{DatabaseError, Store};

/// Body of `POST /users/create`
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Body of `POST /users/token`
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `PATCH`/`PUT /users/me`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Low-level account creation input, used by signup and the CLI
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewAccount {
    pub fn user(email: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn superuser(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: String::new(),
            is_staff: true,
            is_superuser: true,
        }
    }
}

/// Account management and token issuance
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an account without the signup field rules.
    ///
    /// Only the email is required here: it is normalized and must be unique.
    /// Signup goes through `register`, which checks every field first.
    pub async fn create_user(&self, account: NewAccount) -> Result<User, ServiceError> {
        let email = validation::normalize_email(&account.email);
        if email.is_empty() {
            return Err(FieldErrors::single("email", "Users must have an email address").into());
        }

        let password_hash = hash_password(&account.password)?;
        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash,
                name: account.name,
                is_staff: account.is_staff,
                is_superuser: account.is_superuser,
            })
            .await
            .map_err(email_conflict)?;

        info!(user_id = %user.id, superuser = user.is_superuser, "User created");
        Ok(user)
    }

    pub async fn create_superuser(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        self.create_user(NewAccount::superuser(email, password)).await
    }

    /// Signup: validate every field, then create a regular user
    pub async fn register(&self, request: CreateUserRequest) -> Result<UserProfile, ServiceError> {
        let min_length = config::config().security.min_password_length;
        let mut errors = FieldErrors::new();

        let email = validation::check_email(request.email.as_deref(), &mut errors);
        let password = validation::check_password(request.password.as_deref(), min_length, &mut errors);
        let name = validation::check_name("name", request.name.as_deref(), &mut errors);
        ensure_valid(errors)?;

        match (email, password, name) {
            (Some(email), Some(password), Some(name)) => {
                let user = self.create_user(NewAccount::user(email, password, name)).await?;
                Ok(UserProfile::from(user))
            }
            // ensure_valid already rejected any missing field
            _ => Err(ServiceError::Validation(Default::default())),
        }
    }

    /// Exchange email and password for a bearer token.
    ///
    /// Unknown email, wrong password and inactive account all produce the
    /// same `InvalidCredentials` error.
    pub async fn issue_token(&self, request: TokenRequest) -> Result<String, ServiceError> {
        let mut errors = FieldErrors::new();
        let email = match request.email.as_deref() {
            None => {
                errors.add("email", validation::REQUIRED);
                None
            }
            Some(raw) if raw.trim().is_empty() => {
                errors.add("email", validation::BLANK);
                None
            }
            Some(raw) => Some(validation::normalize_email(raw)),
        };
        let password = match request.password.as_deref() {
            None => {
                errors.add("password", validation::REQUIRED);
                None
            }
            Some("") => {
                errors.add("password", validation::BLANK);
                None
            }
            Some(password) => Some(password),
        };
        ensure_valid(errors)?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(ServiceError::Validation(Default::default()));
        };

        // One bcrypt verification on every path, registered email or not
        let user = self.store.find_user_by_email(&email).await?;
        let matched = verify_password_or_dummy(password, user.as_ref().map(|u| u.password_hash.as_str()));
        let user = match user {
            Some(user) if matched && user.is_active => user,
            _ => {
                warn!("Token request rejected: invalid credentials");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let token = generate_jwt(&Claims::for_user(&user)?)?;
        info!(user_id = %user.id, "Token issued");
        Ok(token)
    }

    /// Resolve a token subject back to an active user
    pub async fn active_user(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        let user = self.store.find_user_by_id(id).await?;
        Ok(user.filter(|u| u.is_active))
    }

    /// Update the caller's own account.
    ///
    /// `partial` (PATCH) checks only the fields present; otherwise (PUT)
    /// email, password and name are all required.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
        partial: bool,
    ) -> Result<UserProfile, ServiceError> {
        let min_length = config::config().security.min_password_length;
        let mut errors = FieldErrors::new();
        let mut changes = UserChanges::default();

        if !partial || request.email.is_some() {
            changes.email = validation::check_email(request.email.as_deref(), &mut errors);
        }
        if !partial || request.name.is_some() {
            changes.name = validation::check_name("name", request.name.as_deref(), &mut errors);
        }
        let password = if !partial || request.password.is_some() {
            validation::check_password(request.password.as_deref(), min_length, &mut errors)
        } else {
            None
        };
        ensure_valid(errors)?;

        if let Some(password) = password {
            changes.password_hash = Some(hash_password(password)?);
        }

        let user = if changes.is_empty() {
            self.store
                .find_user_by_id(user_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound("user".to_string()))?
        } else {
            let password_changed = changes.password_hash.is_some();
            let user = self
                .store
                .update_user(user_id, changes)
                .await
                .map_err(email_conflict)?;
            info!(user_id = %user.id, password_changed, "Profile updated");
            user
        };

        Ok(UserProfile::from(user))
    }
}

fn email_conflict(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::UniqueViolation(_) => FieldErrors::single("email", validation::EMAIL_TAKEN).into(),
        DatabaseError::NotFound(what) => ServiceError::NotFound(what),
        other => ServiceError::Database(other),
    }
}
