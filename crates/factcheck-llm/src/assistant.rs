//! Chat assistant
//!
//! Answers a chat message from the first tier that can:
//!
//! 1. an exact match in the canned answer table (no backend call);
//! 2. the chat backend;
//! 3. keyword fallback rules when the backend fails.
//!
//! [`ChatAssistant::reply`] therefore never fails.

use crate::dispatcher::{DispatchError, ProviderDispatcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that can answer a chat message
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Error type for a failed call
    type Error: Display + Send;

    /// Send one message and wait for the reply
    async fn send(&self, message: &str) -> Result<String, Self::Error>;
}

#[async_trait]
impl ChatBackend for ProviderDispatcher {
    type Error = DispatchError;

    async fn send(&self, message: &str) -> Result<String, Self::Error> {
        self.send_message(message).await
    }
}

#[async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for Arc<B> {
    type Error = B::Error;

    async fn send(&self, message: &str) -> Result<String, Self::Error> {
        (**self).send(message).await
    }
}

/// Immutable question → answer table
///
/// Lookups match the message exactly. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct CannedAnswers {
    answers: Arc<HashMap<String, String>>,
}

impl CannedAnswers {
    /// Build a table from question/answer pairs
    pub fn new<I, Q, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        let answers: HashMap<String, String> = pairs
            .into_iter()
            .map(|(q, a)| (q.into(), a.into()))
            .collect();
        Self {
            answers: Arc::new(answers),
        }
    }

    /// Answers for the suggested questions shown in the chat widget
    pub fn suggested() -> Self {
        Self::new([
            (
                "How does fact-checking work?",
                "Submit a claim with any sources you have. It is checked against published reporting and reference material, and you get a trust score from 0 to 100 with an explanation and the evidence that was used.",
            ),
            (
                "How are trust scores calculated?",
                "The score reflects how well the claim is supported by credible sources and how consistent those sources are with each other. Higher scores mean stronger, more consistent support.",
            ),
            (
                "What do the trust score colors mean?",
                "Red (0-20) is very low, orange (21-40) low, amber (41-60) moderate, green (61-80) high and emerald (81-100) very high trust.",
            ),
            (
                "Can trust scores change over time?",
                "Yes. A claim re-checked later can score differently as new reporting appears or earlier sources are corrected.",
            ),
            (
                "What sources are consulted?",
                "News organizations, reference works, official publications and established fact-checking outlets. Sources you attach to a claim are considered as well.",
            ),
            (
                "What can I attach to a claim?",
                "Up to three images (screenshots, photos of printed articles) of at most 5 MB each, plus any number of source links.",
            ),
            (
                "How long does verification take?",
                "Usually a few seconds. You are taken to the result as soon as it is ready.",
            ),
            (
                "Can I give feedback on a result?",
                "Yes. Under every result you can say whether it was helpful, and if not, tell us what was wrong.",
            ),
        ])
    }

    /// Exact-match lookup
    pub fn lookup(&self, message: &str) -> Option<&str> {
        self.answers.get(message).map(String::as_str)
    }

    /// The questions in the table, sorted
    pub fn questions(&self) -> Vec<&str> {
        let mut questions: Vec<&str> = self.answers.keys().map(String::as_str).collect();
        questions.sort_unstable();
        questions
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Keyword rule: any keyword matching selects the answer
#[derive(Debug, Clone)]
struct Rule {
    keywords: Vec<String>,
    answer: String,
}

/// Ordered keyword fallbacks used when the backend fails
///
/// Matching is a case-insensitive substring test; the first matching rule
/// wins, and the default answer covers everything else.
#[derive(Debug, Clone)]
pub struct FallbackRules {
    rules: Vec<Rule>,
    default_answer: String,
}

impl FallbackRules {
    /// Rules with only a default answer
    pub fn new(default_answer: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            default_answer: default_answer.into(),
        }
    }

    /// Append a rule; rules are tried in insertion order
    pub fn rule<K: Into<String>>(
        mut self,
        keywords: impl IntoIterator<Item = K>,
        answer: impl Into<String>,
    ) -> Self {
        self.rules.push(Rule {
            keywords: keywords
                .into_iter()
                .map(|k| {
                    let keyword: String = k.into();
                    keyword.to_lowercase()
                })
                .collect(),
            answer: answer.into(),
        });
        self
    }

    /// Answer for `message`
    pub fn answer(&self, message: &str) -> &str {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|rule| rule.answer.as_str())
            .unwrap_or(self.default_answer.as_str())
    }
}

impl Default for FallbackRules {
    fn default() -> Self {
        FallbackRules::new(
            "I can help with questions about checking claims, trust scores and sources. What would you like to know?",
        )
        .rule(
            ["fact check", "verify"],
            "Claims are verified by comparing them with trusted sources. Submit a claim to get a trust score with an explanation.",
        )
        .rule(
            ["source"],
            "Sources include news organizations, reference works and official publications, each weighed by its credibility.",
        )
        .rule(
            ["trust score"],
            "Trust scores run from 0 to 100. Higher scores mean the claim is better supported by credible sources.",
        )
        .rule(
            ["submit", "upload"],
            "Use the submit command with a title, optional description, sources and up to three images.",
        )
    }
}

/// Which tier produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Canned answer table
    Canned,
    /// Chat backend
    Backend,
    /// Keyword fallback after a backend failure
    Fallback,
}

/// A reply and the tier it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply text
    pub text: String,
    /// Producing tier
    pub source: ReplySource,
}

/// Three-tier chat assistant over a [`ChatBackend`]
pub struct ChatAssistant<B> {
    canned: CannedAnswers,
    backend: B,
    fallback: FallbackRules,
}

impl<B: ChatBackend> ChatAssistant<B> {
    /// Create an assistant with the given canned answers and default fallbacks
    pub fn new(canned: CannedAnswers, backend: B) -> Self {
        Self {
            canned,
            backend,
            fallback: FallbackRules::default(),
        }
    }

    /// Replace the fallback rules
    pub fn with_fallback(mut self, fallback: FallbackRules) -> Self {
        self.fallback = fallback;
        self
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Canned answer table
    pub fn canned(&self) -> &CannedAnswers {
        &self.canned
    }

    /// Answer a message, reporting which tier answered
    pub async fn respond(&self, message: &str) -> Reply {
        if let Some(answer) = self.canned.lookup(message) {
            debug!("Answered from canned table");
            return Reply {
                text: answer.to_string(),
                source: ReplySource::Canned,
            };
        }

        match self.backend.send(message).await {
            Ok(text) => Reply {
                text,
                source: ReplySource::Backend,
            },
            Err(e) => {
                warn!(error = %e, "Chat backend failed, using keyword fallback");
                Reply {
                    text: self.fallback.answer(message).to_string(),
                    source: ReplySource::Fallback,
                }
            }
        }
    }

    /// Answer a message; never fails
    pub async fn reply(&self, message: &str) -> String {
        self.respond(message).await.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
        reply: Result<String, String>,
    }

    impl CountingBackend {
        fn ok(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Ok(text.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Err("unreachable".to_string()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for CountingBackend {
        type Error = String;

        async fn send(&self, _message: &str) -> Result<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_canned_hit_skips_failing_backend() {
        let canned = CannedAnswers::new([("What is this?", "A fact checker.")]);
        let assistant = ChatAssistant::new(canned, CountingBackend::failing());

        let reply = assistant.respond("What is this?").await;
        assert_eq!(reply.text, "A fact checker.");
        assert_eq!(reply.source, ReplySource::Canned);
        assert_eq!(assistant.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_canned_lookup_is_exact() {
        let canned = CannedAnswers::new([("What is this?", "A fact checker.")]);
        let assistant = ChatAssistant::new(canned, CountingBackend::ok("backend"));

        assert_eq!(assistant.reply("what is this?").await, "backend");
        assert_eq!(assistant.reply(" What is this?").await, "backend");
        assert_eq!(assistant.backend().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_uses_keyword_fallback() {
        let assistant = ChatAssistant::new(CannedAnswers::default(), CountingBackend::failing());
        let rules = FallbackRules::default();

        let reply = assistant.respond("How do you VERIFY things?").await;
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.text, rules.answer("verify"));
    }

    #[test]
    fn test_fallback_rule_order() {
        let rules = FallbackRules::default();
        // "fact check" outranks "source"
        assert_eq!(
            rules.answer("fact check this source"),
            rules.answer("fact check")
        );
        assert_eq!(rules.answer("which SOURCES?"), rules.answer("source"));
        assert_eq!(
            rules.answer("what is a trust score"),
            rules.answer("trust score")
        );
        assert_eq!(rules.answer("how to upload"), rules.answer("submit"));
        assert_ne!(rules.answer("hello"), rules.answer("source"));
    }

    #[test]
    fn test_suggested_table() {
        let canned = CannedAnswers::suggested();
        assert!(!canned.is_empty());
        for question in canned.questions() {
            assert!(canned.lookup(question).is_some());
        }
    }

    #[tokio::test]
    async fn test_dispatcher_as_backend() {
        use crate::host::MockHost;
        use crate::MockProvider;

        let dispatcher = ProviderDispatcher::new(
            Arc::new(MockProvider::new("model says hi")),
            Arc::new(MockHost::failing("down")),
        );
        let assistant = ChatAssistant::new(CannedAnswers::default(), dispatcher);
        assert_eq!(assistant.reply("hello").await, "model says hi");

        assistant.backend().toggle_provider();
        let reply = assistant.respond("submit a claim").await;
        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(assistant.backend().last_error().is_some());
    }
}
