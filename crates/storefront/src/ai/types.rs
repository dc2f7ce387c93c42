//! Types for the Groq chat-completions API (OpenAI-compatible schema).

use serde::{Deserialize, Serialize};

/// A message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: MessageContent,
}

impl Message {
    /// A plain-text message.
    #[must_use]
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Flatten the message content to plain text, dropping image parts.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content.text()
    }

    /// The image URL carried by this message, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(_) => None,
            MessageContent::Parts(parts) => parts.iter().find_map(|part| match part {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            }),
        }
    }
}

/// Content of a message - either plain text or a list of content parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content.
    Text(String),
    /// Multiple content parts (for image input).
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten to plain text, joining text parts and dropping images.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A content part within a multi-part message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
    /// An image reference (typically a data URL).
    #[serde(rename = "image_url")]
    ImageUrl {
        /// The image URL wrapper.
        image_url: ImageUrl,
    },
}

/// Image URL wrapper, matching the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model id (e.g. "openai/gpt-oss-120b").
    pub model: String,
    /// Conversation messages, system prompt first.
    pub messages: Vec<Message>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Response from the chat-completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion choices; the first one is the reply.
    pub choices: Vec<Choice>,
    /// Token usage information.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// The text of the first choice, if present and non-empty.
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|text| !text.is_empty())
    }
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The assistant message.
    pub message: AssistantMessage,
    /// Reason the model stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant's reply message.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Reply text. Absent for some reasoning-only responses.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Number of prompt tokens.
    pub prompt_tokens: u32,
    /// Number of completion tokens.
    pub completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_flat() {
        let msg = Message::text(Role::User, "hello");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_parts_message_roundtrip() {
        let json = r#"{
            "role": "user",
            "content": [
                {"type": "text", "text": "what is this?"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
            ]
        }"#;

        let msg: Message = serde_json::from_str(json).expect("deserialize");
        assert_eq!(msg.text_content(), "what is this?");
        assert_eq!(msg.image_url(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_reply_text_empty_choices() {
        let response = ChatCompletionResponse {
            choices: Vec::new(),
            usage: None,
        };
        assert!(response.reply_text().is_none());
    }

    #[test]
    fn test_reply_text_filters_empty_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": ""}, "finish_reason": "stop"}]}"#,
        )
        .expect("deserialize");
        assert!(response.reply_text().is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"content": "Hi there"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3}
            }"#,
        )
        .expect("deserialize");

        assert_eq!(response.reply_text(), Some("Hi there"));
        let usage = response.usage.expect("usage");
        assert_eq!(usage.prompt_tokens, 10);
        assert_eq!(usage.completion_tokens, 3);
    }
}
