//! Backend reply shapes and their normalization into a single display form.

use serde::Deserialize;

use crate::error::DispatchError;
use crate::state::AudioRef;

pub const UNKNOWN_API_ERROR: &str = "Erro desconhecido na API";

/// Every field the agent backend is known to send. All optional: different
/// endpoints fill different subsets.
#[derive(Debug, Default, Deserialize)]
pub struct RawReply {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub michael_text: Option<String>,
    #[serde(default)]
    pub technical_data: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A backend reply after it has been classified.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Success {
        body: ReplyBody,
        technical_data: Option<String>,
    },
    Failure {
        error: Option<String>,
    },
}

/// The displayable part of a successful reply, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// Persona voice reply: spoken audio plus its caption
    Voice {
        caption: Option<String>,
        audio_base64: String,
    },
    Response(String),
    Text(String),
    Empty,
}

/// Uniform shape the chat widget turns into an assistant message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedReply {
    pub content: String,
    pub audio: Option<AudioRef>,
    pub technical_data: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<RawReply> for BackendReply {
    fn from(raw: RawReply) -> Self {
        if raw.success != Some(true) {
            return BackendReply::Failure {
                error: non_empty(raw.error),
            };
        }

        let body = match (
            non_empty(raw.audio_base64),
            non_empty(raw.response),
            non_empty(raw.text),
        ) {
            (Some(audio_base64), _, _) => ReplyBody::Voice {
                caption: raw.michael_text,
                audio_base64,
            },
            (None, Some(response), _) => ReplyBody::Response(response),
            (None, None, Some(text)) => ReplyBody::Text(text),
            (None, None, None) => ReplyBody::Empty,
        };

        BackendReply::Success {
            body,
            technical_data: non_empty(raw.technical_data),
        }
    }
}

impl BackendReply {
    pub fn normalize(self) -> Result<NormalizedReply, DispatchError> {
        match self {
            BackendReply::Failure { error } => Err(DispatchError::Api(
                error.unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
            )),
            BackendReply::Success {
                body,
                technical_data,
            } => {
                let (content, audio) = match body {
                    ReplyBody::Voice {
                        caption,
                        audio_base64,
                    } => (
                        caption.unwrap_or_default(),
                        Some(AudioRef::mp3(audio_base64)),
                    ),
                    ReplyBody::Response(text) | ReplyBody::Text(text) => (text, None),
                    ReplyBody::Empty => (String::new(), None),
                };
                Ok(NormalizedReply {
                    content,
                    audio,
                    technical_data,
                })
            }
        }
    }
}

/// Parse a response body into a normalized reply.
pub fn parse_reply(status: u16, body: &[u8]) -> Result<NormalizedReply, DispatchError> {
    let raw: RawReply = serde_json::from_slice(body)
        .map_err(|source| DispatchError::InvalidBody { status, source })?;
    BackendReply::from(raw).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<NormalizedReply, DispatchError> {
        parse_reply(200, json.as_bytes())
    }

    #[test]
    fn test_response_field() {
        let reply = parse(r#"{"success": true, "response": "X"}"#).unwrap();
        assert_eq!(reply.content, "X");
        assert!(reply.audio.is_none());
        assert!(reply.technical_data.is_none());
    }

    #[test]
    fn test_voice_reply_takes_caption_and_audio() {
        let reply = parse(
            r#"{"success": true, "audio_base64": "QQ==", "michael_text": "Hi", "response": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(reply.content, "Hi");
        assert_eq!(reply.audio, Some(AudioRef::mp3("QQ==")));
    }

    #[test]
    fn test_voice_reply_without_caption_is_empty_text() {
        let reply = parse(r#"{"success": true, "audio_base64": "QQ=="}"#).unwrap();
        assert_eq!(reply.content, "");
        assert!(reply.audio.is_some());
    }

    #[test]
    fn test_text_field_is_fallback() {
        let reply = parse(r#"{"success": true, "text": "fallback"}"#).unwrap();
        assert_eq!(reply.content, "fallback");
    }

    #[test]
    fn test_empty_strings_fall_through() {
        let reply =
            parse(r#"{"success": true, "audio_base64": "", "response": "", "text": "t"}"#).unwrap();
        assert_eq!(reply.content, "t");
        assert!(reply.audio.is_none());
    }

    #[test]
    fn test_no_recognized_field_is_empty_not_error() {
        let reply = parse(r#"{"success": true, "other": 1}"#).unwrap();
        assert_eq!(reply, NormalizedReply::default());
    }

    #[test]
    fn test_technical_data_carried_through() {
        let reply =
            parse(r#"{"success": true, "response": "ok", "technical_data": "SELECT 1"}"#).unwrap();
        assert_eq!(reply.technical_data.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_failure_uses_error_text() {
        let err = parse(r#"{"success": false, "error": "boom"}"#).unwrap_err();
        assert!(matches!(err, DispatchError::Api(ref e) if e == "boom"));
    }

    #[test]
    fn test_missing_success_flag_is_failure() {
        let err = parse(r#"{"response": "X"}"#).unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_API_ERROR);
    }

    #[test]
    fn test_non_json_body() {
        let err = parse_reply(502, b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidBody { status: 502, .. }));
        assert!(err.to_string().contains("502"));
    }
}
