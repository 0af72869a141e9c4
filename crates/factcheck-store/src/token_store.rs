//! Authentication token slot

use crate::StoreError;
use factcheck_domain::traits::{SlotStorage, TOKEN_SLOT};
use std::fmt::Display;
use tracing::info;

/// Key older builds stored the token under
pub const LEGACY_TOKEN_SLOT: &str = "token";

/// Stores the bearer token under a single key
///
/// A token found under [`LEGACY_TOKEN_SLOT`] is moved to the canonical key
/// the first time it is read, so only one key is ever in use afterwards.
pub struct TokenStore<S> {
    slots: S,
}

impl<S> TokenStore<S>
where
    S: SlotStorage,
    S::Error: Display,
{
    /// Wrap a slot storage
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Current token, if any
    pub fn get(&self) -> Result<Option<String>, StoreError> {
        if let Some(token) = self.slots.get(TOKEN_SLOT).map_err(slot_error)? {
            return Ok(Some(token));
        }

        match self.slots.get(LEGACY_TOKEN_SLOT).map_err(slot_error)? {
            Some(token) => {
                self.slots.set(TOKEN_SLOT, &token).map_err(slot_error)?;
                self.slots.remove(LEGACY_TOKEN_SLOT).map_err(slot_error)?;
                info!("Migrated token from legacy slot");
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    /// Store a token
    pub fn set(&self, token: &str) -> Result<(), StoreError> {
        self.slots.set(TOKEN_SLOT, token).map_err(slot_error)
    }

    /// Forget the token (both keys)
    pub fn clear(&self) -> Result<(), StoreError> {
        self.slots.remove(TOKEN_SLOT).map_err(slot_error)?;
        self.slots.remove(LEGACY_TOKEN_SLOT).map_err(slot_error)
    }
}

fn slot_error<E: Display>(e: E) -> StoreError {
    StoreError::Slot(e.to_string())
}
