use async_trait::async_trait;

use crate::domain::identity::models::AccessToken;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Username;
use crate::identity::errors::IdentityError;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity and sign a token for it.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Access token for the created identity
    ///
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    /// * `UsernameTaken` - Username is already registered
    /// * `Password` / `Token` / `DatabaseError` / `Unknown` - Unexpected failure
    async fn register(&self, credentials: Credentials) -> Result<AccessToken, IdentityError>;

    /// Verify credentials of an existing identity and sign a token for it.
    ///
    /// # Arguments
    /// * `credentials` - Username and plaintext password
    ///
    /// # Returns
    /// Access token for the resolved identity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `Token` / `DatabaseError` / `Unknown` - Unexpected failure
    async fn authenticate(&self, credentials: Credentials)
        -> Result<AccessToken, IdentityError>;

    /// Reject a sign-in whose username could never resolve to an identity.
    ///
    /// Performs the same verification work as a sign-in for an unknown
    /// username before failing, so malformed names cost no less than
    /// well-formed ones.
    ///
    /// # Returns
    /// `InvalidCredentials`, or an unexpected error if the work itself failed
    async fn reject_sign_in(&self, password: String) -> IdentityError;
}

/// Persistence operations for the identity aggregate.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist new identity to storage.
    ///
    /// Uniqueness of the username must be enforced atomically by the store.
    ///
    /// # Arguments
    /// * `identity` - Identity entity to create
    ///
    /// # Returns
    /// Created identity entity
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// Retrieve identity by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional identity entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, IdentityError>;
}
