//! Account management API handlers
//!
//! Every operation delegates to the credential gateway; the server
//! stores no account state of its own.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use adalchemy_auth::{AuthUser, BearerToken, GatewayError, Principal, Session};
use adalchemy_common::{Error, Result, ValidatedJson};

use crate::api::middleware::AccountsState;

/// Request for creating an account
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request for signing in
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request for changing the password
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Session response DTO
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            uid: session.uid,
            email: session.email,
            id_token: session.id_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
        }
    }
}

/// Principal response DTO
#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        Self {
            uid: principal.uid,
            email: principal.email,
            display_name: principal.display_name,
        }
    }
}

/// Map gateway failures onto the common error taxonomy
fn map_gateway_error(e: GatewayError) -> Error {
    match e {
        GatewayError::InvalidCredentials | GatewayError::InvalidToken => {
            Error::Authentication(e.to_string())
        }
        GatewayError::EmailInUse | GatewayError::WeakPassword(_) => {
            Error::Validation(e.to_string())
        }
        GatewayError::Configuration(_) | GatewayError::Request(_) | GatewayError::Response(_) => {
            Error::Internal(e.to_string())
        }
    }
}

/// Create an account and return a fresh session
pub async fn signup(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = state
        .gateway
        .sign_up(&request.email, &request.password)
        .await
        .map_err(map_gateway_error)?;

    tracing::info!(uid = %session.uid, "Account created");

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Sign in with email and password
pub async fn signin(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .gateway
        .sign_in(&request.email, &request.password)
        .await
        .map_err(map_gateway_error)?;

    Ok(Json(session.into()))
}

/// Invalidate the caller's session, where the provider supports it
pub async fn signout(
    BearerToken(token): BearerToken,
    State(state): State<AccountsState>,
) -> Result<StatusCode> {
    state
        .gateway
        .sign_out(&token)
        .await
        .map_err(map_gateway_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Return the caller's identity
pub async fn me(AuthUser(principal): AuthUser) -> Json<PrincipalResponse> {
    Json(principal.into())
}

/// Change the caller's password.
///
/// The current password is re-verified through the gateway first; the
/// update runs against the fresh session it returns, never the
/// original bearer token.
pub async fn change_password(
    AuthUser(principal): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .gateway
        .reauthenticate(&principal.email, &request.current_password)
        .await
        .map_err(|e| match e {
            GatewayError::InvalidCredentials => {
                Error::Authentication("Current password is incorrect".to_string())
            }
            e => map_gateway_error(e),
        })?;

    let session = state
        .gateway
        .change_password(&session.id_token, &request.new_password)
        .await
        .map_err(map_gateway_error)?;

    tracing::info!(uid = %session.uid, "Password changed");

    Ok(Json(session.into()))
}
