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
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let Json(body) = payload?;

    // A name that could never have been registered is just another unknown identity
    let username = match Username::new(body.username) {
        Ok(username) => username,
        Err(_) => {
            return Err(state
                .identity_service
                .reject_sign_in(body.password)
                .await
                .into())
        }
    };

    state
        .identity_service
        .authenticate(Credentials::new(username, body.password))
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    username: String,
    password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let request: SignInRequest =
            serde_json::from_str(r#"{"username":"alice","password":"s3cret"}"#).unwrap();

        let debug = format!("{:?}", request);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
    }
}
