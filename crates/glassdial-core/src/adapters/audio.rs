use tracing::info;

/// Receives mute and speaker routing changes
pub trait AudioRoute: Send + Sync {
    fn set_muted(&self, muted: bool);
    fn set_speaker(&self, on: bool);
}

/// Audio route that only logs the requested changes
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingAudioRoute;

impl AudioRoute for LoggingAudioRoute {
    fn set_muted(&self, muted: bool) {
        info!("Mute: {}", muted);
    }

    fn set_speaker(&self, on: bool) {
        info!("Speaker: {}", on);
    }
}
