//! Text-to-speech backends

use crate::{AlertConfig, AlertError};
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::info;

/// Blocking text-to-speech engine. Runs on the notifier's blocking pool.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), AlertError>;
}

/// Speaks through an external TTS program such as `espeak`
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    rate: u32,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, rate: u32) -> Self {
        Self {
            program: program.into(),
            rate,
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<(), AlertError> {
        let status = Command::new(&self.program)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AlertError::Unavailable(self.program.clone()),
                _ => AlertError::Speaker(e.to_string()),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(AlertError::Speaker(format!("{} exited with {}", self.program, status)))
        }
    }
}

/// Writes alerts to the log instead of speaking them
#[derive(Debug, Clone, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, text: &str) -> Result<(), AlertError> {
        info!(alert = text, "Voice alert");
        Ok(())
    }
}

/// Build the speaker selected by the configuration
pub fn speaker_from_config(config: &AlertConfig) -> Arc<dyn Speaker> {
    if config.enabled {
        Arc::new(CommandSpeaker::new(config.voice_program.clone(), config.voice_rate))
    } else {
        Arc::new(LogSpeaker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let speaker = CommandSpeaker::new("definitely-not-a-tts-engine-7f3a", 165);
        assert!(matches!(speaker.speak("hello"), Err(AlertError::Unavailable(_))));
    }

    #[test]
    fn test_log_speaker_never_fails() {
        assert!(LogSpeaker.speak("Bad posture detected").is_ok());
    }
}
