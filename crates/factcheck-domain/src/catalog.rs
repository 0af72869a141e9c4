//! Previously checked claims, as listed by the claims catalog

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Verdict attached to a catalogued claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Claim holds up
    True,
    /// Claim is false
    False,
    /// Uncertain; also used for unknown wire values
    #[default]
    Neutral,
}

impl Verdict {
    /// Parse a verdict; unknown values are `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "true" => Some(Verdict::True),
            "false" => Some(Verdict::False),
            "neutral" | "uncertain" => Some(Verdict::Neutral),
            _ => None,
        }
    }

    /// Label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::Neutral => "Uncertain",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid verdict: {}", s))
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Verdict::parse).unwrap_or_default())
    }
}

/// Catalogue identifier; the backend sends either numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric id
    Number(u64),
    /// Textual id
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// A named source link on a catalogued claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Display name
    pub name: String,
    /// Link target
    pub url: String,
}

/// A claim that has already been checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Catalogue identifier
    pub id: RecordId,
    /// Claim text
    pub text: String,
    /// Why the verdict was reached
    #[serde(default)]
    pub explanation: String,
    /// Verdict
    #[serde(default)]
    pub verdict: Verdict,
    /// Trust score
    #[serde(default)]
    pub score: f64,
    /// When the claim was checked, as sent by the backend
    #[serde(default)]
    pub timestamp: String,
    /// Cited sources
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// Search and verdict filter over the catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimFilter {
    /// Case-insensitive substring over text and explanation
    pub search: Option<String>,
    /// Restrict to one verdict; `None` means all
    pub verdict: Option<Verdict>,
}

impl ClaimFilter {
    /// Whether a record passes the filter
    pub fn matches(&self, record: &ClaimRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.text.to_lowercase().contains(&term)
                    || record.explanation.to_lowercase().contains(&term)
            }
        };

        let matches_verdict = self.verdict.map_or(true, |v| v == record.verdict);

        matches_search && matches_verdict
    }

    /// Apply the filter, keeping catalogue order
    pub fn apply<'a>(&self, records: &'a [ClaimRecord]) -> Vec<&'a ClaimRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
