//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Fixed slot holding the latest verification result
pub const RESULT_SLOT: &str = "claimResult";

/// Fixed slot holding the authentication token
pub const TOKEN_SLOT: &str = "authToken";

/// Trait for durable string slots keyed by name
///
/// This is the client-side persistence contract: one value per key, last
/// write wins, no history. Implemented by the infrastructure layer
/// (factcheck-store).
pub trait SlotStorage {
    /// Error type for storage operations
    type Error;

    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the value under `key`; absent keys are not an error
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for std::sync::Arc<S> {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}
