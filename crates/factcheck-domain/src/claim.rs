//! Claim drafts - what the user is editing before a submission

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Unique identifier for a staged attachment based on UUIDv7
///
/// UUIDv7 keeps identifiers ordered by creation time, so committed
/// attachments sort in the order they were picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttachmentId(uuid::Uuid);

impl AttachmentId {
    /// Generate a new UUIDv7-based AttachmentId
    ///
    /// # Examples
    ///
    /// ```
    /// use factcheck_domain::AttachmentId;
    ///
    /// let a = AttachmentId::new();
    /// let b = AttachmentId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse an AttachmentId from its string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid attachment id: {}", e))
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content the claim was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaType {
    /// News or blog article
    #[default]
    Article,

    /// Post on a social network
    #[serde(rename = "Social Media Post")]
    SocialMediaPost,

    /// Video content
    Video,

    /// Anything else
    Other,
}

impl MediaType {
    /// All media types in display order
    pub const ALL: [MediaType; 4] = [
        MediaType::Article,
        MediaType::SocialMediaPost,
        MediaType::Video,
        MediaType::Other,
    ];

    /// Display label, also the wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Article => "Article",
            MediaType::SocialMediaPost => "Social Media Post",
            MediaType::Video => "Video",
            MediaType::Other => "Other",
        }
    }

    /// Parse a media type from its label (case-insensitive)
    ///
    /// Accepts the compact forms `social` and `socialmediapost` as well.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "article" => Some(MediaType::Article),
            "social media post" | "socialmediapost" | "social" => Some(MediaType::SocialMediaPost),
            "video" => Some(MediaType::Video),
            "other" => Some(MediaType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid media type: {}", s))
    }
}

/// An image attached to a draft once its contents have been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Identifier allocated when staging started
    pub id: AttachmentId,

    /// Original file name
    pub name: String,

    /// MIME type reported for the file (always `image/*`)
    pub mime_type: String,

    /// `data:<mime>;base64,<payload>` preview of the file contents
    pub preview_data_uri: String,
}

impl Attachment {
    /// Reduce to what a submission carries
    pub fn summary(&self) -> AttachmentSummary {
        AttachmentSummary {
            name: self.name.clone(),
            preview_data_uri: self.preview_data_uri.clone(),
        }
    }
}

/// Attachment as transmitted alongside a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSummary {
    /// Original file name
    pub name: String,

    /// Data URI of the file contents
    pub preview_data_uri: String,
}

/// A claim being edited in the submission form
///
/// Drafts are never persisted; they live until a successful submission
/// navigates away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDraft {
    /// Short statement of the claim (required)
    pub title: String,

    /// Additional context
    pub description: String,

    /// Source URLs; blank rows are allowed while editing
    pub sources: Vec<String>,

    /// Where the claim was encountered
    pub media_type: MediaType,

    /// Committed image attachments
    pub attachments: Vec<Attachment>,
}

impl ClaimDraft {
    /// Create a draft with a title and otherwise empty fields
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Append an empty source row
    pub fn add_source(&mut self) {
        self.sources.push(String::new());
    }

    /// Replace the source at `index`, growing the list if needed
    pub fn set_source(&mut self, index: usize, value: impl Into<String>) {
        if index >= self.sources.len() {
            self.sources.resize(index + 1, String::new());
        }
        self.sources[index] = value.into();
    }

    /// Remove the source row at `index`
    ///
    /// The form always keeps at least one source row, so removing the last
    /// remaining row is refused. Returns whether a row was removed.
    pub fn remove_source(&mut self, index: usize) -> bool {
        if self.sources.len() <= 1 || index >= self.sources.len() {
            return false;
        }
        self.sources.remove(index);
        true
    }

    /// Sources with blank rows dropped and whitespace trimmed
    pub fn cleaned_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Attachments reduced to `{name, preview}`
    pub fn attachment_summaries(&self) -> Vec<AttachmentSummary> {
        self.attachments.iter().map(Attachment::summary).collect()
    }
}

impl Default for ClaimDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            sources: vec![String::new()],
            media_type: MediaType::default(),
            attachments: Vec::new(),
        }
    }
}
