//! Account services: registration, login and profile management.
//!
//! Password hashing is CPU bound, so every [`PasswordHasher`] call runs on
//! tokio's blocking pool instead of an HTTP worker thread.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, RegistrationCommand, UpdateProfileRequest,
    UserPersistenceError, UserProfileCommand, UserProfileQuery, UserRepository,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordHash, Registration, User, UserId, UserProfile,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
/// Hashed once and checked against when an email is unknown, so a miss
/// costs as much as a wrong password.
const DECOY_PASSWORD: &str = "bookshare decoy password";

/// Account service implementing the registration, login and profile ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    decoy: Arc<OnceLock<PasswordHash>>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
            decoy: Arc::new(OnceLock::new()),
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("email is already registered")
                .with_details(serde_json::json!({ "field": "email" }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password check failed: {error}"))
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.users.find_by_email(email).await.map_err(map_user_error)
    }

    /// Run `job` against the hasher on the blocking pool.
    async fn off_worker<T, F>(&self, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHasherError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || job(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hasher_error)
    }

    async fn decoy_hash(&self) -> Result<PasswordHash, Error> {
        if let Some(hash) = self.decoy.get() {
            return Ok(hash.clone());
        }
        let hash = self.off_worker(|hasher| hasher.hash(DECOY_PASSWORD)).await?;
        Ok(self.decoy.get_or_init(|| hash).clone())
    }

    async fn verify_password(
        &self,
        password: &str,
        stored: Option<PasswordHash>,
    ) -> Result<bool, Error> {
        let known = stored.is_some();
        let stored = match stored {
            Some(hash) => hash,
            None => self.decoy_hash().await?,
        };
        let password = Zeroizing::new(password.to_owned());
        let matches = self
            .off_worker(move |hasher| hasher.verify(&password, &stored))
            .await?;
        Ok(known && matches)
    }
}

#[async_trait]
impl<U, H> RegistrationCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        if self.find_by_email(&registration.details().email).await?.is_some() {
            return Err(map_user_error(UserPersistenceError::duplicate_email(
                registration.details().email.as_ref(),
            )));
        }
        let password = Zeroizing::new(registration.password().to_owned());
        let password_hash = self
            .off_worker(move |hasher| hasher.hash(&password))
            .await?;
        let user = User::register(
            UserId::random(),
            registration.into_details(),
            password_hash,
            self.clock.utc(),
        );
        // The repository re-checks uniqueness in case of a concurrent registration.
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(UserProfile::from(&user))
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserProfile, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let user = self.find_by_email(&email).await?;
        let stored = user.as_ref().map(|user| user.password_hash().clone());
        let matches = self
            .verify_password(credentials.password(), stored)
            .await?;
        let Some(user) = user.filter(|_| matches) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if user.is_banned() {
            warn!(user_id = %user.id(), "banned user attempted to log in");
            return Err(Error::forbidden("account is banned"));
        }
        Ok(UserProfile::from(&user))
    }
}

#[async_trait]
impl<U, H> UserProfileQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .map(|user| UserProfile::from(&user))
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, H> UserProfileCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<UserProfile, Error> {
        let UpdateProfileRequest {
            actor,
            user_id,
            update,
        } = request;
        if actor != user_id {
            return Err(Error::forbidden("users may only edit their own profile"));
        }
        if update.is_empty() {
            return Err(Error::invalid_request(
                "update must change at least one field",
            ));
        }
        let user = self
            .users
            .update_profile(&user_id, &update)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        info!(user_id = %user_id, "profile updated");
        Ok(UserProfile::from(&user))
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
