#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Markdown enrichment of raw listing descriptions.
//!
//! Scraped listings carry long free-text descriptions. Each one is turned
//! into a structured markdown summary by a [`generator::DescriptionGenerator`]
//! (an LLM in production) at most once per listing id; the
//! [`cache::DescriptionEnrichmentCache`] remembers the result for the life
//! of the process.
//!
//! The `OpenAI` generator also talks to any `OpenAI`-compatible server
//! (Ollama, vLLM, LM Studio) via the `AI_BASE_URL` environment variable.

pub mod cache;
pub mod generator;
pub mod openai;

use thiserror::Error;

/// Errors that can occur while enriching a description.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The generator could not produce a description.
    #[error("Generator error: {message}")]
    Generator {
        /// Description of what went wrong.
        message: String,
    },

    /// HTTP request to the LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The raw description was empty or whitespace.
    #[error("Description is empty")]
    EmptyInput,

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
