use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::domain::identity::models::AccessToken;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for registration and sign-in.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
/// Hashing and verification are CPU-bound and run on the blocking thread pool.
pub struct IdentityService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
    token_expiration_hours: Option<i64>,
}

impl<IR> IdentityService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `token_expiration_hours` - Lifetime of issued tokens; `None` issues tokens without `exp`
    ///
    /// # Returns
    /// Configured identity service instance
    pub fn new(
        repository: Arc<IR>,
        authenticator: Arc<Authenticator>,
        token_expiration_hours: Option<i64>,
    ) -> Self {
        Self {
            repository,
            authenticator,
            token_expiration_hours,
        }
    }

    fn claims_for(&self, identity: &Identity) -> Result<Claims, IdentityError> {
        let claims = Claims::for_identity(identity.id, identity.username.as_str());
        match self.token_expiration_hours {
            Some(hours) => Ok(claims.with_expiration_hours(hours)?),
            None => Ok(claims),
        }
    }
}

#[async_trait]
impl<IR> IdentityServicePort for IdentityService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, credentials: Credentials) -> Result<AccessToken, IdentityError> {
        let Credentials { username, password } = credentials;

        if password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        if self.repository.find_by_username(&username).await?.is_some() {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Err(IdentityError::UsernameTaken(username.to_string()));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password)).await??;

        let identity = Identity {
            id: IdentityId::new(),
            username,
            password_hash,
            created_at: Utc::now(),
        };

        // An invalid token lifetime must fail before anything is persisted
        let claims = self.claims_for(&identity)?;

        let created = self.repository.create(identity).await.map_err(|e| {
            if let IdentityError::UsernameTaken(ref name) = e {
                tracing::warn!(username = %name, "Username claimed concurrently during registration");
            }
            e
        })?;

        tracing::info!(
            identity_id = %created.id,
            username = %created.username,
            "Identity registered"
        );

        let token = self
            .authenticator
            .issue_token(&claims)
            .map_err(|e| {
                tracing::error!(
                    identity_id = %created.id,
                    error = %e,
                    "Identity persisted but token issuance failed"
                );
                IdentityError::from(e)
            })?;

        Ok(AccessToken(token))
    }

    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AccessToken, IdentityError> {
        let Credentials { username, password } = credentials;
        let authenticator = Arc::clone(&self.authenticator);

        let Some(identity) = self.repository.find_by_username(&username).await? else {
            let rejection = self.reject_sign_in(password).await;
            tracing::info!(username = %username, "Sign-in rejected");
            return Err(rejection);
        };

        let claims = self.claims_for(&identity)?;
        let stored_hash = identity.password_hash;
        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &claims)
        })
        .await?;

        match result {
            Ok(result) => {
                tracing::info!(
                    identity_id = %identity.id,
                    username = %identity.username,
                    "Identity authenticated"
                );
                Ok(AccessToken(result.access_token))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(username = %username, "Sign-in rejected");
                Err(IdentityError::InvalidCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn reject_sign_in(&self, password: String) -> IdentityError {
        let authenticator = Arc::clone(&self.authenticator);
        match tokio::task::spawn_blocking(move || authenticator.reject_unknown(&password)).await {
            Ok(rejection) => rejection.into(),
            Err(e) => e.into(),
        }
    }
}
