//! Speech capability interface.
//!
//! Voice playback and recognition are platform services. Environments
//! without them get [`NoopSpeech`].

use anyhow::Result;
use log::debug;

#[cfg_attr(test, mockall::automock)]
pub trait SpeechService: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Reads `text` aloud in the given language.
    fn speak(&self, text: &str, language: &str) -> Result<()>;

    /// Stops any playback in progress.
    fn stop(&self) -> Result<()>;
}

/// Speech service for platforms with no speech support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSpeech;

impl SpeechService for NoopSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&self, text: &str, language: &str) -> Result<()> {
        debug!(
            "Speech unsupported, skipping {} characters in {}",
            text.chars().count(),
            language
        );
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        Ok(())
    }
}
