//! Verification results and normalization of the shapes they arrive in
//!
//! The verification service answers either with a flat body
//! (`{score, explanation, evidence}`) or with the same body nested under
//! `result`. Persisted results may carry the claim text as `claim` or
//! `claimText`. [`VerificationPayload`] accepts all of these and
//! [`VerificationPayload::into_result`] collapses them into one
//! [`VerificationResult`].

use serde::{Deserialize, Deserializer, Serialize};

/// Score used when a response carries none
pub const DEFAULT_SCORE: u8 = 50;

/// A supporting source citation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evidence {
    /// Title of the cited page
    #[serde(default)]
    pub title: String,

    /// URL of the cited page
    #[serde(default)]
    pub link: String,

    /// Relevant excerpt
    #[serde(default)]
    pub snippet: String,
}

/// Outcome of a successful verification call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// The claim that was verified
    pub claim_text: String,

    /// Trust score in [0, 100]
    pub score: u8,

    /// Explanation from the verification service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// Supporting citations, in the order the service returned them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl VerificationResult {
    /// Create a result, clamping the score into [0, 100]
    pub fn new(claim_text: impl Into<String>, score: i64) -> Self {
        Self {
            claim_text: claim_text.into(),
            score: score.clamp(0, 100) as u8,
            explanation: None,
            evidence: Vec::new(),
        }
    }
}

/// Clamp a raw numeric score into [0, 100], rounding to the nearest integer
///
/// Non-finite input falls back to [`DEFAULT_SCORE`].
pub fn clamp_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return DEFAULT_SCORE;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Body fields shared by the flat and nested response shapes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationBody {
    /// Raw score (number or numeric string)
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f64>,

    /// Explanation text
    #[serde(default)]
    pub explanation: Option<String>,

    /// Evidence list
    #[serde(default)]
    pub evidence: Option<Vec<Evidence>>,
}

/// Any accepted verification response or persisted result
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPayload {
    /// Nested form: `{result: {...}}`
    #[serde(default)]
    pub result: Option<VerificationBody>,

    /// Flat form
    #[serde(flatten)]
    pub body: VerificationBody,

    /// Claim text when the payload carries it
    #[serde(default, alias = "claim")]
    pub claim_text: Option<String>,
}

impl VerificationPayload {
    /// Collapse into a [`VerificationResult`]
    ///
    /// Nested fields take precedence over flat ones. `claim_text` is used
    /// when the payload does not carry its own claim text.
    pub fn into_result(self, claim_text: &str) -> VerificationResult {
        let nested = self.result.unwrap_or_default();
        let flat = self.body;

        let score = nested
            .score
            .or(flat.score)
            .map(clamp_score)
            .unwrap_or(DEFAULT_SCORE);

        VerificationResult {
            claim_text: self.claim_text.unwrap_or_else(|| claim_text.to_string()),
            score,
            explanation: nested.explanation.or(flat.explanation),
            evidence: nested.evidence.or(flat.evidence).unwrap_or_default(),
        }
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
