//! Groq chat-completions API client.
//!
//! The relay uses two models: a vision-capable model to describe skin
//! photos and a text-reasoning model for the conversational reply. Both go
//! through the same OpenAI-compatible endpoint.

mod client;
mod error;
mod types;

pub use client::GroqClient;
pub use error::{AiError, ApiErrorDetail, ApiErrorResponse};
pub use types::{
    AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, Choice, ContentPart,
    ImageUrl, Message, MessageContent, Role, Usage,
};
