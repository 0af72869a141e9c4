//! Authentication session.
//!
//! The bearer token lives in one slot (`authToken`). Logging in stores it,
//! logging out removes it, and restoring a session re-validates a stored
//! token against `verify-token`, discarding it when it no longer works.

use crate::client::FactCheckClient;
use crate::error::ClientError;
use crate::forms::{LoginForm, SignupForm};
use crate::wire::UserProfile;
use factcheck_domain::traits::SlotStorage;
use factcheck_store::TokenStore;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Logged-in state shared by the commands of one process
pub struct AuthSession<S> {
    client: Arc<FactCheckClient>,
    tokens: TokenStore<S>,
    user: Mutex<Option<UserProfile>>,
}

impl<S> AuthSession<S>
where
    S: SlotStorage,
    S::Error: Display,
{
    /// Create a session over a client and token slot
    pub fn new(client: Arc<FactCheckClient>, tokens: TokenStore<S>) -> Self {
        Self {
            client,
            tokens,
            user: Mutex::new(None),
        }
    }

    /// The backend client, carrying the session token
    pub fn client(&self) -> &Arc<FactCheckClient> {
        &self.client
    }

    /// Profile of the logged-in user
    pub fn user(&self) -> Option<UserProfile> {
        self.user.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Whether a token is in use
    pub fn is_logged_in(&self) -> bool {
        self.client.token().is_some()
    }

    fn set_user(&self, user: Option<UserProfile>) {
        *self.user.lock().unwrap_or_else(|p| p.into_inner()) = user;
    }

    /// Log in and persist the returned token
    pub async fn login(&self, form: &LoginForm) -> Result<UserProfile, ClientError> {
        let report = form.validate();
        if !report.is_ok() {
            return Err(ClientError::Invalid(report));
        }

        let response = self.client.login(form.email.trim(), &form.password).await?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Login failed".to_string());
            return Err(ClientError::Auth(message));
        }
        let token = response
            .token
            .ok_or_else(|| ClientError::Decode("login response has no token".to_string()))?;

        self.tokens.set(&token)?;
        self.client.set_token(Some(token));

        let user = response.user.unwrap_or_default();
        self.set_user(Some(user.clone()));
        info!(user = %user.display_name(), "Logged in");
        Ok(user)
    }

    /// Create an account; the user still has to log in afterwards
    pub async fn signup(&self, form: &SignupForm) -> Result<String, ClientError> {
        let report = form.validate();
        if !report.is_ok() {
            return Err(ClientError::Invalid(report));
        }

        let response = self.client.signup(&form.to_request()).await?;
        if !response.success {
            return Err(ClientError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Signup failed".to_string()),
            ));
        }
        info!("Account created");
        Ok(response
            .message
            .unwrap_or_else(|| "Account created successfully! Please log in.".to_string()))
    }

    /// Forget the token
    pub fn logout(&self) -> Result<(), ClientError> {
        self.tokens.clear()?;
        self.client.set_token(None);
        self.set_user(None);
        info!("Logged out");
        Ok(())
    }

    /// Re-validate a stored token
    ///
    /// A token the backend does not accept, or cannot check, is removed.
    pub async fn restore(&self) -> Result<Option<UserProfile>, ClientError> {
        let Some(token) = self.tokens.get()? else {
            return Ok(None);
        };

        match self.client.verify_token(&token).await {
            Ok(user) => {
                self.client.set_token(Some(token));
                self.set_user(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                warn!(error = %e, "Stored token rejected, removing it");
                self.tokens.clear()?;
                self.client.set_token(None);
                self.set_user(None);
                Ok(None)
            }
        }
    }

    /// Fetch the profile again with the current token
    ///
    /// Unlike [`restore`](Self::restore) a failure leaves the token alone.
    pub async fn refresh_user(&self) -> bool {
        let Ok(Some(token)) = self.tokens.get() else {
            return false;
        };
        match self.client.verify_token(&token).await {
            Ok(user) => {
                self.set_user(Some(user));
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh user");
                false
            }
        }
    }
}
