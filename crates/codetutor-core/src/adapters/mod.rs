//! Inference Adapters
//!
//! Concrete [`InferenceClient`](crate::InferenceClient) implementations for
//! external generative-text services.

mod openai;

pub use openai::{OpenAiChatClient, OpenAiSettings};
