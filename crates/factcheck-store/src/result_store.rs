//! Single-slot store for the latest verification result

use crate::StoreError;
use factcheck_domain::traits::{SlotStorage, RESULT_SLOT};
use factcheck_domain::{VerificationPayload, VerificationResult};
use std::fmt::Display;
use tracing::{debug, warn};

/// Holds the most recent [`VerificationResult`]
///
/// Writes overwrite unconditionally. Reads never fail: a missing slot,
/// unparsable contents, or a storage error all read as "no result".
pub struct VerificationResultStore<S> {
    slots: S,
}

impl<S> VerificationResultStore<S>
where
    S: SlotStorage,
    S::Error: Display,
{
    /// Wrap a slot storage
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Underlying slot storage
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Replace the stored result
    pub fn write(&self, result: &VerificationResult) -> Result<(), StoreError> {
        let json = serde_json::to_string(result)?;
        self.slots
            .set(RESULT_SLOT, &json)
            .map_err(|e| StoreError::Slot(e.to_string()))?;
        debug!(score = result.score, "Stored verification result");
        Ok(())
    }

    /// Read the stored result
    ///
    /// Accepts the flat and nested payload shapes; results written before
    /// the claim text was stored read back with an empty claim text.
    pub fn read(&self) -> Option<VerificationResult> {
        let raw = match self.slots.get(RESULT_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read stored result: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<VerificationPayload>(&raw) {
            Ok(payload) => Some(payload.into_result("")),
            Err(e) => {
                warn!("Stored result is unreadable, ignoring it: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySlots;
    use factcheck_domain::Evidence;

    #[test]
    fn test_read_empty_is_none() {
        let store = VerificationResultStore::new(MemorySlots::new());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let store = VerificationResultStore::new(MemorySlots::new());
        let mut result = VerificationResult::new("Vaccines cause flu", 25);
        result.explanation = Some("contradicted by sources".to_string());
        result.evidence.push(Evidence {
            title: "CDC".to_string(),
            link: "https://www.cdc.gov".to_string(),
            snippet: "Flu vaccines cannot cause flu".to_string(),
        });

        store.write(&result).unwrap();
        assert_eq!(store.read(), Some(result));
    }

    #[test]
    fn test_last_write_wins() {
        let store = VerificationResultStore::new(MemorySlots::new());
        store.write(&VerificationResult::new("first", 10)).unwrap();
        store.write(&VerificationResult::new("second", 90)).unwrap();

        let read = store.read().unwrap();
        assert_eq!(read.claim_text, "second");
        assert_eq!(read.score, 90);
    }

    #[test]
    fn test_corrupted_slot_reads_as_none() {
        let slots = MemorySlots::new();
        slots.set(RESULT_SLOT, "{not json").unwrap();
        let store = VerificationResultStore::new(slots);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_reads_nested_legacy_shape() {
        let slots = MemorySlots::new();
        slots
            .set(
                RESULT_SLOT,
                r#"{"claim": "Old claim", "result": {"score": 72, "explanation": "ok"}}"#,
            )
            .unwrap();
        let store = VerificationResultStore::new(slots);

        let read = store.read().unwrap();
        assert_eq!(read.claim_text, "Old claim");
        assert_eq!(read.score, 72);
        assert_eq!(read.explanation.as_deref(), Some("ok"));
    }
}
