//! Credential primitives library
//!
//! Provides the security-relevant building blocks of the identity service:
//! - Password hashing (Argon2id, per-call random salt, configurable work factor)
//! - JWT token issuance and validation (HS256)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingParams, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashingParams::default()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "not-a-hash"));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let claims = Claims::for_identity("3f1c", "alice");
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.username(), Some("alice"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims, HashingParams};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", HashingParams::default()).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims::for_identity("3f1c", "alice");
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! let decoded: Claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("3f1c"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::MAX_EXPIRATION_HOURS;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
