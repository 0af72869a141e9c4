//! Host-mediated chat transport
//!
//! GPT and Grok are reached through a chat host that answers in whatever
//! shape the underlying model produced: a stream of chunks, an object with a
//! `message`, or a bare string. [`ReplyShape::classify`] sorts a
//! [`HostReply`] into one of those shapes and [`ReplyShape::into_text`]
//! reduces it to the reply text.

use crate::gemini::DEFAULT_TIMEOUT_SECS;
use crate::LlmError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Stream of reply chunks
pub type ChunkStream = BoxStream<'static, Result<ReplyChunk, LlmError>>;

/// One piece of a streamed reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyChunk {
    /// Chunk text; missing text counts as empty
    #[serde(default, alias = "content")]
    pub text: Option<String>,
}

impl ReplyChunk {
    /// Chunk carrying text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Chunk carrying nothing
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_value(value: Value) -> Self {
        let text = match value {
            Value::String(s) => Some(s),
            Value::Object(map) => map
                .get("text")
                .or_else(|| map.get("content"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        Self { text }
    }
}

/// Request sent to a chat host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRequest {
    /// User message
    pub message: String,

    /// Host-side model id (e.g. "gpt-4o")
    pub model: String,

    /// System prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Whether a chunked reply is acceptable
    pub stream: bool,
}

/// Raw reply from a chat host
pub enum HostReply {
    /// Lazily produced chunks
    Chunks(ChunkStream),

    /// A complete JSON value
    Value(Value),
}

impl fmt::Debug for HostReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostReply::Chunks(_) => f.write_str("HostReply::Chunks(..)"),
            HostReply::Value(v) => f.debug_tuple("HostReply::Value").field(v).finish(),
        }
    }
}

/// A host reply sorted by shape
///
/// Classification order: chunks, then an object carrying `message`, then a
/// plain string. Anything else is kept as a value and rendered as text.
pub enum ReplyShape {
    /// Concatenate chunk texts in arrival order
    Streamed(ChunkStream),

    /// `message.content` (or `message` as a string)
    Message(String),

    /// The reply was a plain string
    Text(String),

    /// Unrecognized value
    Other(Value),
}

impl ReplyShape {
    /// Sort a raw reply into its shape
    pub fn classify(reply: HostReply) -> Self {
        let value = match reply {
            HostReply::Chunks(chunks) => return ReplyShape::Streamed(chunks),
            HostReply::Value(value) => value,
        };

        if let Some(message) = value.get("message") {
            match message {
                Value::Object(inner) => {
                    if let Some(content) = inner.get("content").and_then(Value::as_str) {
                        return ReplyShape::Message(content.to_string());
                    }
                }
                Value::String(s) => return ReplyShape::Message(s.clone()),
                _ => {}
            }
        }

        match value {
            Value::String(s) => ReplyShape::Text(s),
            other => ReplyShape::Other(other),
        }
    }

    /// Short name of the shape, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyShape::Streamed(_) => "streamed",
            ReplyShape::Message(_) => "message",
            ReplyShape::Text(_) => "text",
            ReplyShape::Other(_) => "other",
        }
    }

    /// Reduce to the reply text, consuming a stream to completion
    pub async fn into_text(self) -> Result<String, LlmError> {
        match self {
            ReplyShape::Streamed(mut chunks) => {
                let mut full = String::new();
                let mut count = 0usize;
                while let Some(chunk) = chunks.next().await {
                    if let Some(text) = chunk?.text {
                        full.push_str(&text);
                    }
                    count += 1;
                }
                debug!(chunks = count, "Consumed streamed reply");
                Ok(full)
            }
            ReplyShape::Message(s) | ReplyShape::Text(s) => Ok(s),
            ReplyShape::Other(value) => Ok(value.to_string()),
        }
    }
}

impl fmt::Debug for ReplyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyShape::Streamed(_) => f.write_str("Streamed(..)"),
            ReplyShape::Message(s) => f.debug_tuple("Message").field(s).finish(),
            ReplyShape::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ReplyShape::Other(v) => f.debug_tuple("Other").field(v).finish(),
        }
    }
}

/// Transport to a chat host
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Send one chat request
    async fn chat(&self, request: HostRequest) -> Result<HostReply, LlmError>;
}

#[async_trait]
impl<H: ChatHost + ?Sized> ChatHost for Arc<H> {
    async fn chat(&self, request: HostRequest) -> Result<HostReply, LlmError> {
        (**self).chat(request).await
    }
}

/// Chat host reached over HTTP
///
/// Posts the request as JSON to `{endpoint}/chat`. `application/x-ndjson`
/// and `text/event-stream` bodies are read as chunk streams; any other body
/// is parsed as JSON, falling back to the raw text.
pub struct HttpChatHost {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatHost {
    /// Create a host client for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a host client with a request timeout
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl ChatHost for HttpChatHost {
    async fn chat(&self, request: HostRequest) -> Result<HostReply, LlmError> {
        let url = format!("{}/chat", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(request.model));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-ndjson")
            || content_type.starts_with("text/event-stream")
        {
            debug!(content_type = %content_type, "Host replied with a chunk stream");
            return Ok(HostReply::Chunks(chunk_stream(response.bytes_stream())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read body: {}", e)))?;
        let value = serde_json::from_str(&body).unwrap_or(Value::String(body));
        Ok(HostReply::Value(value))
    }
}

enum Line {
    Chunk(Result<ReplyChunk, LlmError>),
    Skip,
    Done,
}

fn parse_line(raw: &[u8]) -> Line {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty()
        || line.starts_with(':')
        || line.starts_with("event:")
        || line.starts_with("id:")
        || line.starts_with("retry:")
    {
        return Line::Skip;
    }

    let payload = line.strip_prefix("data:").map(str::trim).unwrap_or(line);
    if payload == "[DONE]" {
        return Line::Done;
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(value) => Line::Chunk(Ok(ReplyChunk::from_value(value))),
        Err(e) => Line::Chunk(Err(LlmError::InvalidResponse(format!(
            "Malformed chunk: {}",
            e
        )))),
    }
}

/// Split complete lines off the front of `buffer` and parse them
///
/// Returns the parsed chunks and whether a terminator was seen.
fn drain_lines(buffer: &mut Vec<u8>, flush: bool) -> (Vec<Result<ReplyChunk, LlmError>>, bool) {
    let mut out = Vec::new();
    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        match parse_line(&line) {
            Line::Chunk(chunk) => out.push(chunk),
            Line::Skip => {}
            Line::Done => return (out, true),
        }
    }
    if flush && !buffer.is_empty() {
        let rest = std::mem::take(buffer);
        match parse_line(&rest) {
            Line::Chunk(chunk) => out.push(chunk),
            Line::Skip => {}
            Line::Done => return (out, true),
        }
    }
    (out, flush)
}

/// Turn a byte stream of newline-delimited JSON (optionally `data:` framed)
/// into a stream of reply chunks
///
/// A `[DONE]` line or the end of the byte stream ends the chunk stream.
/// A transport error is yielded once and ends the stream.
pub fn chunk_stream<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = (Box::pin(bytes), Vec::<u8>::new(), false);
    stream::unfold(state, |(mut bytes, mut buffer, finished)| async move {
        if finished {
            return None;
        }
        match bytes.next().await {
            Some(Ok(data)) => {
                buffer.extend_from_slice(data.as_ref());
                let (chunks, done) = drain_lines(&mut buffer, false);
                Some((chunks, (bytes, buffer, done)))
            }
            Some(Err(e)) => {
                let err = LlmError::Communication(format!("Stream interrupted: {}", e));
                Some((vec![Err(err)], (bytes, buffer, true)))
            }
            None => {
                let (chunks, _) = drain_lines(&mut buffer, true);
                Some((chunks, (bytes, buffer, true)))
            }
        }
    })
    .flat_map(stream::iter)
    .boxed()
}

/// Canned reply for [`MockHost`]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Stream these chunks
    Chunks(Vec<ReplyChunk>),

    /// Answer with this value
    Value(Value),

    /// Fail with this message
    Error(String),
}

/// Deterministic chat host for testing
///
/// Replies are served from a queue; once the queue holds one reply, that
/// reply is repeated. Every request is recorded.
#[derive(Debug, Clone)]
pub struct MockHost {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<HostRequest>>>,
    delay: Option<Duration>,
}

impl MockHost {
    /// Host that always answers with `reply`
    pub fn new(reply: MockReply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from([reply]))),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Host streaming the given chunk texts
    pub fn chunks<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(MockReply::Chunks(
            texts.into_iter().map(ReplyChunk::text).collect(),
        ))
    }

    /// Host answering with a JSON value
    pub fn value(value: Value) -> Self {
        Self::new(MockReply::Value(value))
    }

    /// Host that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::Error(message.into()))
    }

    /// Queue another reply after the current ones
    pub fn then(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(reply);
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<HostRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn next_reply(&self) -> Option<MockReply> {
        let mut replies = self.replies.lock().unwrap_or_else(|p| p.into_inner());
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    }
}

#[async_trait]
impl ChatHost for MockHost {
    async fn chat(&self, request: HostRequest) -> Result<HostReply, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply() {
            Some(MockReply::Chunks(chunks)) => Ok(HostReply::Chunks(
                stream::iter(chunks.into_iter().map(Ok)).boxed(),
            )),
            Some(MockReply::Value(value)) => Ok(HostReply::Value(value)),
            Some(MockReply::Error(message)) => Err(LlmError::Communication(message)),
            None => Err(LlmError::Other("No mock reply configured".to_string())),
        }
    }
}
