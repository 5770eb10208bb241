//! CodeTutor Core
//!
//! Core types, traits, and utilities shared across CodeTutor components.
//!
//! This crate provides:
//! - Common chat message and inference parameter types
//! - Error types and result handling
//! - The `InferenceClient` seam the classification pipeline is built against
//! - An OpenAI-compatible chat completions client

pub mod adapters;
pub mod error;
pub mod inference;
pub mod types;

pub use adapters::{OpenAiChatClient, OpenAiSettings};
pub use error::{Error, Result};
pub use inference::{InferenceClient, InferenceError};
pub use types::{ChatMessage, InferenceParams};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::inference::{InferenceClient, InferenceError};
    pub use crate::types::{ChatMessage, InferenceParams};
}
