use clap::Parser;
use dunder_core::config::BASE_URL_ENV;

/// Terminal console for the DunderAI agents
#[derive(Parser, Debug)]
#[command(name = "dunder", version)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    /// Page to open on start: /, /orchestrator, /finance, /emails, /compliance or /michael
    #[arg(long, default_value = "/")]
    pub page: String,

    /// Sets the logging verbosity level
    /// Possible values: "error", "warn", "info", "debug", "trace"
    #[arg(long)]
    pub logging_level: Option<String>,

    /// Audio player command line, without the file argument (e.g. "mpv --no-video")
    #[arg(long)]
    pub audio_player: Option<String>,
}

impl Cli {
    pub fn audio_player_command(&self) -> Option<Vec<String>> {
        self.audio_player
            .as_deref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|cmd| !cmd.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dunder"]).unwrap();
        assert_eq!(cli.page, "/");
        assert!(cli.logging_level.is_none());
        assert!(cli.audio_player_command().is_none());
    }

    #[test]
    fn test_audio_player_split() {
        let cli = Cli::try_parse_from([
            "dunder",
            "--page",
            "/michael",
            "--audio-player",
            "ffplay -nodisp -autoexit",
        ])
        .unwrap();
        assert_eq!(cli.page, "/michael");
        assert_eq!(
            cli.audio_player_command(),
            Some(vec!["ffplay".to_string(), "-nodisp".to_string(), "-autoexit".to_string()])
        );
    }

    #[test]
    fn test_base_url_flag() {
        let cli = Cli::try_parse_from(["dunder", "--base-url", "http://localhost:5000"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:5000"));
    }
}
