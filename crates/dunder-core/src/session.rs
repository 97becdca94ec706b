use crate::error::{DispatchError, SubmitError};
use crate::reply::NormalizedReply;
use crate::state::ChatMessage;
use crate::store::MessageStore;

/// One conversation: its messages plus whether a request is outstanding.
///
/// Created when a chat page mounts and dropped when it unmounts.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    store: MessageStore,
    in_flight: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.store.append(ChatMessage::assistant(greeting));
        session
    }

    pub fn messages(&self) -> &MessageStore {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Accept a user utterance. On success the user turn is already appended
    /// and the returned text is what should be sent.
    pub fn submit(&mut self, input: &str) -> Result<String, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::Busy);
        }
        let utterance = input.trim();
        if utterance.is_empty() {
            return Err(SubmitError::Blank);
        }

        self.store.append(ChatMessage::user(utterance));
        self.in_flight = true;
        Ok(utterance.to_string())
    }

    /// Record how the outstanding request ended. Exactly one assistant turn is
    /// appended per call.
    pub fn settle(&mut self, outcome: Result<NormalizedReply, DispatchError>) -> &ChatMessage {
        self.in_flight = false;
        let message = match outcome {
            Ok(reply) => ChatMessage {
                audio: reply.audio,
                technical_data: reply.technical_data,
                ..ChatMessage::assistant(reply.content)
            },
            Err(e) => ChatMessage::error(e),
        };
        self.store.append(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AudioRef, ChatRole};

    #[test]
    fn test_submit_appends_user_turn_immediately() {
        let mut session = ChatSession::new();
        let sent = session.submit("  olá  ").unwrap();

        assert_eq!(sent, "olá");
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages().last().map(|m| m.role), Some(ChatRole::User));
        assert!(session.is_busy());
    }

    #[test]
    fn test_blank_submit_appends_nothing() {
        let mut session = ChatSession::new();
        assert_eq!(session.submit(" \n\t"), Err(SubmitError::Blank));
        assert!(session.messages().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_second_submit_while_busy_is_refused() {
        let mut session = ChatSession::new();
        session.submit("primeira").unwrap();
        assert_eq!(session.submit("segunda"), Err(SubmitError::Busy));
        assert_eq!(session.messages().len(), 1);

        session.settle(Ok(NormalizedReply::default()));
        assert!(session.submit("segunda").is_ok());
    }

    #[test]
    fn test_settle_success_appends_one_assistant_turn() {
        let mut session = ChatSession::with_greeting("oi");
        session.submit("pergunta").unwrap();
        let reply = NormalizedReply {
            content: "Hi".into(),
            audio: Some(AudioRef::mp3("QQ==")),
            technical_data: Some("trace".into()),
        };
        let msg = session.settle(Ok(reply)).clone();

        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(msg.content, "Hi");
        assert!(msg.audio.is_some());
        assert_eq!(msg.technical_data.as_deref(), Some("trace"));
        assert!(!msg.is_error);
        assert_eq!(session.messages().len(), 3);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_settle_error_flags_turn() {
        let mut session = ChatSession::new();
        session.submit("pergunta").unwrap();
        let msg = session.settle(Err(DispatchError::Api("boom".into())));

        assert!(msg.is_error);
        assert!(msg.content.contains("boom"));
    }

    #[test]
    fn test_order_is_append_order() {
        let mut session = ChatSession::with_greeting("g");
        for q in ["a", "b", "c"] {
            session.submit(q).unwrap();
            session.settle(Ok(NormalizedReply {
                content: q.to_uppercase(),
                ..Default::default()
            }));
        }
        let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["g", "a", "A", "b", "B", "c", "C"]);
    }
}
