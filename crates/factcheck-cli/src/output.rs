//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::{Color, Colorize};
use factcheck_client::UserProfile;
use factcheck_domain::{ClaimRecord, TrustScoreDescriptor, Verdict, VerificationResult};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Cells in the score gauge
const GAUGE_WIDTH: usize = 20;

/// Longest claim text shown in a table cell
const MAX_CELL_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Horizontal gauge filled in proportion to the ring.
    ///
    /// The filled share is `1 - ring_offset / circumference`, so the gauge
    /// and the ring always agree.
    pub fn score_gauge(&self, trust: &TrustScoreDescriptor) -> String {
        let filled_share = if trust.circumference > 0.0 {
            1.0 - trust.ring_offset / trust.circumference
        } else {
            0.0
        };
        let filled = ((filled_share * GAUGE_WIDTH as f64).round() as usize).min(GAUGE_WIDTH);
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(GAUGE_WIDTH - filled)
        );
        format!(
            "[{}] {}/100",
            self.paint_hex(&bar, trust.color),
            trust.score
        )
    }

    /// Format a rendered score.
    pub fn format_score(&self, trust: &TrustScoreDescriptor) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&trust_json(trust))?),
            OutputFormat::Quiet => Ok(trust.score.to_string()),
            OutputFormat::Table => Ok(format!(
                "{}\n{} {}",
                self.score_gauge(trust),
                trust.emoji,
                self.paint_hex(trust.label, trust.color)
            )),
        }
    }

    /// Format a verification result with its rendered score.
    pub fn format_result(
        &self,
        result: &VerificationResult,
        trust: &TrustScoreDescriptor,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::to_value(result)?;
                value["trust"] = trust_json(trust);
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(result.score.to_string()),
            OutputFormat::Table => {
                let mut out = String::new();
                if !result.claim_text.is_empty() {
                    out.push_str(&format!("Claim: {}\n\n", result.claim_text));
                }
                out.push_str(&self.format_score(trust)?);
                if let Some(explanation) = &result.explanation {
                    out.push_str(&format!("\n\n{}", explanation));
                }
                if result.evidence.is_empty() {
                    out.push_str(&format!("\n\n{}", self.info("No evidence returned.")));
                } else {
                    let mut builder = Builder::default();
                    builder.push_record(["Evidence", "Link", "Snippet"]);
                    for evidence in &result.evidence {
                        builder.push_record([
                            truncate(&evidence.title, MAX_CELL_CHARS),
                            evidence.link.clone(),
                            truncate(&evidence.snippet, MAX_CELL_CHARS),
                        ]);
                    }
                    out.push_str("\n\n");
                    out.push_str(&styled(builder));
                }
                Ok(out)
            }
        }
    }

    /// Format catalogue records.
    pub fn format_claims(&self, claims: &[&ClaimRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(claims)?),
            OutputFormat::Quiet => Ok(claims
                .iter()
                .map(|c| c.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if claims.is_empty() {
                    return Ok(self.paint("No claims found.", Color::Yellow));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Claim", "Verdict", "Score", "Checked", "Sources"]);
                for claim in claims {
                    builder.push_record([
                        claim.id.to_string(),
                        truncate(&claim.text, MAX_CELL_CHARS),
                        self.verdict(claim.verdict),
                        format!("{:.0}", claim.score),
                        claim.timestamp.clone(),
                        claim.sources.len().to_string(),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format a user profile.
    pub fn format_user(&self, user: &UserProfile) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(user)?),
            OutputFormat::Quiet => Ok(user.email.clone().unwrap_or_default()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Name", "Email", "ID"]);
                builder.push_record([
                    user.display_name(),
                    user.email.clone().unwrap_or_default(),
                    user.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                ]);
                Ok(styled(builder))
            }
        }
    }

    fn verdict(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::True => Color::Green,
            Verdict::False => Color::Red,
            Verdict::Neutral => Color::Yellow,
        };
        self.paint(verdict.label(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.paint(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.paint(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.paint(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.paint(&format!("⚠ {}", message), Color::Yellow)
    }

    /// Colorize text if color is enabled.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_hex(&self, text: &str, hex: &str) -> String {
        match hex_rgb(hex) {
            Some((r, g, b)) => self.paint(text, Color::TrueColor { r, g, b }),
            None => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn trust_json(trust: &TrustScoreDescriptor) -> serde_json::Value {
    json!({
        "score": trust.score,
        "band": trust.band.as_str(),
        "label": trust.label,
        "color": trust.color,
        "circumference": trust.circumference,
        "ring_offset": trust.ring_offset,
    })
}

/// Parse `#RRGGBB`.
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Shorten text to `max` characters with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use factcheck_domain::{Evidence, RecordId, TrustScoreRenderer};

    fn record(id: u64, text: &str, verdict: Verdict) -> ClaimRecord {
        ClaimRecord {
            id: RecordId::Number(id),
            text: text.to_string(),
            explanation: String::new(),
            verdict,
            score: 42.0,
            timestamp: "2024-03-01T10:00:00Z".to_string(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_gauge_tracks_ring() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let renderer = TrustScoreRenderer::default();

        assert_eq!(
            formatter.score_gauge(&renderer.render(0)),
            format!("[{}] 0/100", "░".repeat(20))
        );
        assert_eq!(
            formatter.score_gauge(&renderer.render(100)),
            format!("[{}] 100/100", "█".repeat(20))
        );
        let half = formatter.score_gauge(&renderer.render(50));
        assert_eq!(half.matches('█').count(), 10);
    }

    #[test]
    fn test_score_formats() {
        let trust = TrustScoreRenderer::default().render(25);

        let table = Formatter::new(OutputFormat::Table, false).format_score(&trust).unwrap();
        assert!(table.contains("Low Trust Score - Exercise Caution"));

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_score(&trust).unwrap();
        assert_eq!(quiet, "25");

        let json = Formatter::new(OutputFormat::Json, false).format_score(&trust).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["band"], "low");
    }

    #[test]
    fn test_result_table_and_json() {
        let trust = TrustScoreRenderer::default().render(80);
        let mut result = VerificationResult::new("Bats are blind", 80);
        result.explanation = Some("Most bats can see".to_string());
        result.evidence.push(Evidence {
            title: "Bat vision".to_string(),
            link: "https://example.com/bats".to_string(),
            snippet: "Bats see well at dusk".to_string(),
        });

        let table = Formatter::new(OutputFormat::Table, false)
            .format_result(&result, &trust)
            .unwrap();
        assert!(table.contains("Bats are blind"));
        assert!(table.contains("Most bats can see"));
        assert!(table.contains("https://example.com/bats"));

        let json = Formatter::new(OutputFormat::Json, false)
            .format_result(&result, &trust)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 80);
        assert_eq!(value["trust"]["band"], "high");
    }

    #[test]
    fn test_claims_formats() {
        let a = record(1, "The Earth is round", Verdict::True);
        let b = record(2, "Bats are blind", Verdict::False);
        let claims = vec![&a, &b];

        let table = Formatter::new(OutputFormat::Table, false)
            .format_claims(&claims)
            .unwrap();
        assert!(table.contains("Verdict"));
        assert!(!table.contains("Uncertain"));
        assert!(table.contains("False"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_claims(&claims)
            .unwrap();
        assert_eq!(quiet, "1\n2");

        let empty = Formatter::new(OutputFormat::Table, false)
            .format_claims(&[])
            .unwrap();
        assert!(empty.contains("No claims found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(hex_rgb("#EA580C"), Some((0xEA, 0x58, 0x0C)));
        assert_eq!(hex_rgb("EA580C"), None);
        assert_eq!(hex_rgb("#EA58"), None);
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
