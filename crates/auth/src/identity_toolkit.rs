//! Google Identity Toolkit implementation
//!
//! Calls the identity-toolkit REST surface
//! (https://identitytoolkit.googleapis.com/v1/accounts:*) using the
//! project's web API key. Token verification happens provider-side via
//! `accounts:lookup`; no keys are held locally.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::gateway::{CredentialGateway, GatewayConfig, GatewayError, Principal, Session};

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Response body shared by signUp / signInWithPassword / update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    email: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

/// Identity-toolkit error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Production credential gateway over the Google Identity Toolkit
pub struct IdentityToolkitGateway {
    client: Client,
    config: GatewayConfig,
    base_url: String,
}

impl IdentityToolkitGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, action, self.config.api_key
        )
    }

    /// Map identity-toolkit error message codes onto gateway errors
    fn map_api_error(message: &str) -> GatewayError {
        match message {
            "EMAIL_EXISTS" => GatewayError::EmailInUse,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => GatewayError::InvalidCredentials,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => GatewayError::InvalidToken,
            m if m.starts_with("WEAK_PASSWORD") => GatewayError::WeakPassword(m.to_string()),
            m => GatewayError::Response(format!("Identity toolkit error: {}", m)),
        }
    }

    async fn post_for_tokens(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<TokenResponse, GatewayError> {
        tracing::debug!(action = %action, "Sending identity-toolkit request");

        let response = self
            .client
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(Self::map_api_error(&error_response.error.message));
            }

            return Err(GatewayError::Response(format!(
                "Identity toolkit returned {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Response(format!("Failed to parse response: {}", e)))
    }
}

impl From<TokenResponse> for Session {
    fn from(r: TokenResponse) -> Self {
        Session {
            uid: r.local_id,
            email: r.email,
            id_token: r.id_token,
            refresh_token: r.refresh_token,
            expires_in: r.expires_in.parse().unwrap_or(3600),
        }
    }
}

#[async_trait::async_trait]
impl CredentialGateway for IdentityToolkitGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        Ok(self.post_for_tokens("signUp", body).await?.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        Ok(self.post_for_tokens("signInWithPassword", body).await?.into())
    }

    async fn sign_out(&self, _id_token: &str) -> Result<(), GatewayError> {
        // The identity-toolkit surface has no server-side sign-out;
        // the caller discards its tokens.
        tracing::debug!("Sign-out requested; tokens are discarded client-side");
        Ok(())
    }

    async fn reauthenticate(
        &self,
        email: &str,
        current_password: &str,
    ) -> Result<Session, GatewayError> {
        self.sign_in(email, current_password).await
    }

    async fn change_password(
        &self,
        id_token: &str,
        new_password: &str,
    ) -> Result<Session, GatewayError> {
        let body = json!({
            "idToken": id_token,
            "password": new_password,
            "returnSecureToken": true,
        });
        Ok(self.post_for_tokens("update", body).await?.into())
    }

    async fn lookup(&self, id_token: &str) -> Result<Principal, GatewayError> {
        let body = json!({ "idToken": id_token });

        let response = self
            .client
            .post(self.endpoint("lookup"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(Self::map_api_error(&error_response.error.message));
            }

            return Err(GatewayError::Response(format!(
                "Identity toolkit returned {}: {}",
                status, error_body
            )));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Response(format!("Failed to parse response: {}", e)))?;

        let account = lookup
            .users
            .into_iter()
            .next()
            .ok_or(GatewayError::InvalidToken)?;

        Ok(Principal {
            uid: account.local_id,
            email: account.email.unwrap_or_default(),
            display_name: account.display_name,
        })
    }
}
