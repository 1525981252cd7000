use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Username;
use crate::identity::errors::IdentityError;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .identity_service
        .register(body.try_into_credentials()?)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::CREATED, token.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RegisterRequest {
    fn try_into_credentials(self) -> Result<Credentials, IdentityError> {
        let username = Username::new(self.username)?;
        Ok(Credentials::new(username, self.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"username":"alice","password":"s3cret"}"#).unwrap();

        let debug = format!("{:?}", request);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_try_into_credentials_rejects_blank_username() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"username":"  ","password":"s3cret"}"#).unwrap();

        assert!(matches!(
            request.try_into_credentials(),
            Err(IdentityError::InvalidUsername(_))
        ));
    }
}
