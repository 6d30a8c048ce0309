//! Mock credential gateway
//!
//! In-memory users and sessions for testing and development. Sign-out
//! revokes the session so tests can assert revocation; tokens are
//! opaque `mock-token-*` strings.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::gateway::{CredentialGateway, GatewayError, Principal, Session};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct MockUser {
    uid: String,
    password: String,
    display_name: Option<String>,
}

/// Mock credential gateway backed by in-memory maps
#[derive(Default)]
pub struct MockCredentialGateway {
    /// email -> account
    users: RwLock<HashMap<String, MockUser>>,
    /// id token -> email
    sessions: RwLock<HashMap<String, String>>,
}

impl MockCredentialGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account and return a live session for it.
    ///
    /// Test convenience so suites don't have to route through sign-up.
    pub fn seed_user(&self, email: &str, password: &str) -> Session {
        let uid = Uuid::new_v4().to_string();
        self.users.write().unwrap().insert(
            email.to_string(),
            MockUser {
                uid: uid.clone(),
                password: password.to_string(),
                display_name: None,
            },
        );
        self.issue_session(&uid, email)
    }

    fn issue_session(&self, uid: &str, email: &str) -> Session {
        let id_token = format!("mock-token-{}", Uuid::new_v4().simple());
        self.sessions
            .write()
            .unwrap()
            .insert(id_token.clone(), email.to_string());

        Session {
            uid: uid.to_string(),
            email: email.to_string(),
            id_token,
            refresh_token: format!("mock-refresh-{}", Uuid::new_v4().simple()),
            expires_in: 3600,
        }
    }

    fn email_for_token(&self, id_token: &str) -> Result<String, GatewayError> {
        self.sessions
            .read()
            .unwrap()
            .get(id_token)
            .cloned()
            .ok_or(GatewayError::InvalidToken)
    }
}

#[async_trait::async_trait]
impl CredentialGateway for MockCredentialGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(GatewayError::WeakPassword(
                "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
            ));
        }

        let uid = Uuid::new_v4().to_string();
        {
            let mut users = self.users.write().unwrap();
            if users.contains_key(email) {
                return Err(GatewayError::EmailInUse);
            }
            users.insert(
                email.to_string(),
                MockUser {
                    uid: uid.clone(),
                    password: password.to_string(),
                    display_name: None,
                },
            );
        }

        Ok(self.issue_session(&uid, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let uid = {
            let users = self.users.read().unwrap();
            let user = users.get(email).ok_or(GatewayError::InvalidCredentials)?;
            if user.password != password {
                return Err(GatewayError::InvalidCredentials);
            }
            user.uid.clone()
        };

        Ok(self.issue_session(&uid, email))
    }

    async fn sign_out(&self, id_token: &str) -> Result<(), GatewayError> {
        self.sessions.write().unwrap().remove(id_token);
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
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(GatewayError::WeakPassword(
                "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
            ));
        }

        let email = self.email_for_token(id_token)?;
        let uid = {
            let mut users = self.users.write().unwrap();
            let user = users.get_mut(&email).ok_or(GatewayError::InvalidToken)?;
            user.password = new_password.to_string();
            user.uid.clone()
        };

        Ok(self.issue_session(&uid, &email))
    }

    async fn lookup(&self, id_token: &str) -> Result<Principal, GatewayError> {
        let email = self.email_for_token(id_token)?;
        let users = self.users.read().unwrap();
        let user = users.get(&email).ok_or(GatewayError::InvalidToken)?;

        Ok(Principal {
            uid: user.uid.clone(),
            email: email.clone(),
            display_name: user.display_name.clone(),
        })
    }
}
