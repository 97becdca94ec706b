//! Playback of synthesized speech attached to assistant turns.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::state::AudioRef;

/// Players tried in order when none is configured.
pub const DEFAULT_PLAYERS: &[&[&str]] = &[
    &["mpv", "--no-video", "--really-quiet"],
    &["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"],
    &["afplay"],
];

/// Something that can play one payload at a time.
pub trait AudioSink {
    fn start(&mut self, audio: &AudioRef) -> Result<()>;
    fn stop(&mut self);
}

/// The single playback element owned by one chat widget.
///
/// Starting a playback always stops the previous one first. Start failures are
/// logged and otherwise ignored: the conversation never shows them.
pub struct AudioPlayback<S: AudioSink> {
    sink: S,
}

impl<S: AudioSink> AudioPlayback<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn play(&mut self, audio: &AudioRef) {
        self.sink.stop();
        if let Err(e) = self.sink.start(audio) {
            warn!(error = %e, "audio playback did not start");
        }
    }

    pub fn replay(&mut self, audio: &AudioRef) {
        debug!("replaying audio");
        self.play(audio);
    }

    pub fn stop(&mut self) {
        self.sink.stop();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Plays payloads by handing a temp file to an external command-line player.
pub struct ExternalPlayer {
    command: Option<Vec<String>>,
    current: Option<(Child, NamedTempFile)>,
}

impl ExternalPlayer {
    /// `command` is the player invocation without the file argument. When
    /// `None`, the first of [`DEFAULT_PLAYERS`] found on `PATH` is used.
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.filter(|c| !c.is_empty()),
            current: None,
        }
    }

    fn resolve_command(&self) -> Result<Vec<String>> {
        if let Some(cmd) = &self.command {
            return Ok(cmd.clone());
        }
        DEFAULT_PLAYERS
            .iter()
            .find(|cmd| find_in_path(cmd[0]).is_some())
            .map(|cmd| cmd.iter().map(|s| s.to_string()).collect())
            .ok_or_else(|| anyhow!("no audio player found (tried mpv, ffplay, afplay)"))
    }
}

impl AudioSink for ExternalPlayer {
    fn start(&mut self, audio: &AudioRef) -> Result<()> {
        let bytes = STANDARD
            .decode(audio.base64.trim())
            .context("audio payload is not valid base64")?;

        let mut file = tempfile::Builder::new()
            .prefix("dunder-audio-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        let command = self.resolve_command()?;
        let child = Command::new(&command[0])
            .args(&command[1..])
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch {}", command[0]))?;

        debug!(player = %command[0], bytes = bytes.len(), "audio playback started");
        self.current = Some((child, file));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some((mut child, _file)) = self.current.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    if Path::new(program).components().count() > 1 {
        return Some(PathBuf::from(program));
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
