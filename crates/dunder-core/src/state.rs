//! UI-agnostic conversation types
//!
//! These are shared by every front-end of the console and don't depend on any
//! specific UI framework.

use serde::{Deserialize, Serialize};

/// MIME type the backend uses for synthesized speech.
pub const AUDIO_MIME_MP3: &str = "audio/mp3";

/// A single turn in a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub audio: Option<AudioRef>,
    pub technical_data: Option<String>,
    pub is_error: bool,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            audio: None,
            technical_data: None,
            is_error: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            audio: None,
            technical_data: None,
            is_error: false,
        }
    }

    /// An assistant turn describing a failed request
    pub fn error(reason: impl std::fmt::Display) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: format!("⚠️ Erro de comunicação: {}", reason),
            audio: None,
            technical_data: None,
            is_error: true,
        }
    }
}

/// Opaque handle to a playable audio payload.
///
/// The payload is kept exactly as the backend sent it (base64 text) and is only
/// decoded when something actually plays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRef {
    pub mime_type: String,
    pub base64: String,
}

impl AudioRef {
    pub fn mp3(base64: impl Into<String>) -> Self {
        Self {
            mime_type: AUDIO_MIME_MP3.to_string(),
            base64: base64.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_embeds_reason() {
        let msg = ChatMessage::error("boom");
        assert_eq!(msg.role, ChatRole::Assistant);
        assert!(msg.is_error);
        assert!(msg.content.contains("boom"));
    }

    #[test]
    fn test_mp3_audio_ref_keeps_payload() {
        let audio = AudioRef::mp3("QQ==");
        assert_eq!(audio.mime_type, "audio/mp3");
        assert_eq!(audio.base64, "QQ==");
    }
}
