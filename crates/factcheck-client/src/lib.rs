//! FactCheck Backend Client
//!
//! Async HTTP client for the FactCheck backend: claim verification, the
//! claim catalogue, authentication and the chat endpoint.
//!
//! # Example
//!
//! ```no_run
//! use factcheck_client::FactCheckClient;
//!
//! # async fn example() -> Result<(), factcheck_client::ClientError> {
//! let client = FactCheckClient::new("http://localhost:5000/api");
//! let payload = client.verify_claim("Vaccines cause flu").await?;
//! let result = payload.into_result("Vaccines cause flu");
//! println!("score: {}", result.score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod auth;
mod client;
mod error;
mod forms;
pub mod wire;

pub use auth::AuthSession;
pub use client::{
    FactCheckClient, CLARIFICATION_REPLY, DEFAULT_API_URL, DEFAULT_CHAT_CONTEXT,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::ClientError;
pub use forms::{LoginForm, SignupForm, MIN_PASSWORD_CHARS};
pub use wire::UserProfile;
