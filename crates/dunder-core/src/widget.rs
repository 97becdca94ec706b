use crate::agents::AgentConfig;
use crate::audio::{AudioPlayback, AudioSink};
use crate::error::{DispatchError, SubmitError};
use crate::reply::NormalizedReply;
use crate::session::ChatSession;
use crate::state::ChatMessage;

/// One mounted chat page: its agent, its conversation and its playback element.
pub struct ChatWidget<S: AudioSink> {
    agent: &'static AgentConfig,
    session: ChatSession,
    audio: AudioPlayback<S>,
}

impl<S: AudioSink> ChatWidget<S> {
    pub fn mount(agent: &'static AgentConfig, sink: S) -> Self {
        Self {
            agent,
            session: ChatSession::with_greeting(agent.greeting()),
            audio: AudioPlayback::new(sink),
        }
    }

    pub fn agent(&self) -> &'static AgentConfig {
        self.agent
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn audio(&self) -> &AudioPlayback<S> {
        &self.audio
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    pub fn submit(&mut self, input: &str) -> Result<String, SubmitError> {
        self.session.submit(input)
    }

    /// Append the reply (or failure) for the outstanding request and start its
    /// audio, if any.
    pub fn settle(&mut self, outcome: Result<NormalizedReply, DispatchError>) -> &ChatMessage {
        let message = self.session.settle(outcome);
        if let Some(audio) = &message.audio {
            self.audio.play(audio);
        }
        message
    }

    /// Play the audio of an earlier turn again. Returns false if that turn has
    /// no audio.
    pub fn replay(&mut self, index: usize) -> bool {
        let Some(audio) = self.session.messages().get(index).and_then(|m| m.audio.clone()) else {
            return false;
        };
        self.audio.replay(&audio);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{FINANCE, MICHAEL};
    use crate::state::{AudioRef, ChatRole};

    #[derive(Default)]
    struct CountingSink {
        starts: usize,
    }

    impl AudioSink for CountingSink {
        fn start(&mut self, _audio: &AudioRef) -> anyhow::Result<()> {
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn test_mount_starts_with_greeting() {
        let widget = ChatWidget::mount(&MICHAEL, CountingSink::default());
        let first = widget.session().messages().get(0).unwrap();
        assert_eq!(first.role, ChatRole::Assistant);
        assert_eq!(first.content, MICHAEL.greeting());
    }

    #[test]
    fn test_voice_reply_plays_once() {
        let mut widget = ChatWidget::mount(&MICHAEL, CountingSink::default());
        widget.submit("oi michael").unwrap();
        let msg = widget
            .settle(crate::reply::parse_reply(
                200,
                br#"{"success": true, "audio_base64": "QQ==", "michael_text": "Hi"}"#,
            ))
            .clone();

        assert_eq!(msg.content, "Hi");
        assert!(msg.audio.is_some());
        assert_eq!(widget.audio().sink().starts, 1);
    }

    #[test]
    fn test_text_reply_plays_nothing() {
        let mut widget = ChatWidget::mount(&FINANCE, CountingSink::default());
        widget.submit("total?").unwrap();
        widget.settle(Ok(NormalizedReply {
            content: "X".into(),
            ..Default::default()
        }));
        assert_eq!(widget.audio().sink().starts, 0);
    }

    #[test]
    fn test_replay_only_for_audio_turns() {
        let mut widget = ChatWidget::mount(&MICHAEL, CountingSink::default());
        widget.submit("oi").unwrap();
        widget.settle(Ok(NormalizedReply {
            content: "Hi".into(),
            audio: Some(AudioRef::mp3("QQ==")),
            technical_data: None,
        }));

        assert!(!widget.replay(0));
        assert!(widget.replay(2));
        assert!(!widget.replay(99));
        assert_eq!(widget.audio().sink().starts, 2);
    }
}
