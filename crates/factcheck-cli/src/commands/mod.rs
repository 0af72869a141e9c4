//! Command implementations.

pub mod account;
pub mod chat;
pub mod claims;
pub mod configure;
pub mod result;
pub mod score;
pub mod submit;

pub use self::account::{execute_login, execute_logout, execute_signup, execute_whoami};
pub use self::chat::execute_chat;
pub use self::claims::execute_claims;
pub use self::configure::execute_config;
pub use self::result::execute_result;
pub use self::score::execute_score;
pub use self::submit::execute_submit;

use crate::config::Config;
use crate::error::Result;
use factcheck_client::{AuthSession, FactCheckClient};
use factcheck_store::{SqliteSlots, TokenStore, VerificationResultStore};
use std::sync::Arc;
use tracing::debug;

/// Slot storage shared by every command
pub type Slots = Arc<SqliteSlots>;

/// Local state opened for commands that touch storage or the backend.
pub struct App {
    /// Effective configuration
    pub config: Config,
    /// Persistent slots (result and token)
    pub slots: Slots,
    /// Authentication session over the backend client
    pub session: AuthSession<Slots>,
}

impl App {
    /// Open the slot database and attach any stored token to the client.
    ///
    /// The token is not re-validated here; `whoami` does that.
    pub fn open(config: Config) -> Result<Self> {
        std::fs::create_dir_all(config.data_dir()?)?;
        let slots: Slots = Arc::new(SqliteSlots::new(config.db_path()?)?);

        let client = Arc::new(FactCheckClient::new(&config.api_url));
        let tokens = TokenStore::new(Arc::clone(&slots));
        if let Some(token) = tokens.get()? {
            debug!("Using stored session token");
            client.set_token(Some(token));
        }

        Ok(Self {
            session: AuthSession::new(client, tokens),
            slots,
            config,
        })
    }

    /// Backend client carrying the session token.
    pub fn client(&self) -> &Arc<FactCheckClient> {
        self.session.client()
    }

    /// Store holding the latest verification result.
    pub fn results(&self) -> VerificationResultStore<Slots> {
        VerificationResultStore::new(Arc::clone(&self.slots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factcheck_domain::traits::{SlotStorage, TOKEN_SLOT};

    #[test]
    fn test_open_attaches_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            ..Config::default()
        };

        let app = App::open(config.clone()).unwrap();
        assert!(app.client().token().is_none());
        app.slots.set(TOKEN_SLOT, "abc").unwrap();
        drop(app);

        let app = App::open(config).unwrap();
        assert_eq!(app.client().token().as_deref(), Some("abc"));
        assert!(app.results().read().is_none());
    }
}
