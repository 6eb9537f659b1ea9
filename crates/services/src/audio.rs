use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::PlaybackError;

/// Short feedback sounds played around answers and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Correct,
    Wrong,
    Applause,
}

impl AudioCue {
    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            AudioCue::Correct => "https://www.soundjay.com/buttons/sounds/button-37.mp3",
            AudioCue::Wrong => "https://www.soundjay.com/buttons/sounds/button-10.mp3",
            AudioCue::Applause => "https://www.soundjay.com/human/sounds/applause-01.mp3",
        }
    }
}

/// Host audio output.
pub trait AudioPlayer: Send + Sync {
    /// Stop whatever clip is currently playing.
    fn stop(&self);

    /// Start playing the clip at `url`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError` if the host refuses or fails to play it.
    fn play(&self, url: &str) -> Result<(), PlaybackError>;
}

/// One clip at a time, failures ignored.
///
/// Every `play` stops the previous clip first. Playback problems such as
/// blocked autoplay never reach the game.
#[derive(Clone)]
pub struct AudioChannel {
    player: Arc<dyn AudioPlayer>,
}

impl AudioChannel {
    #[must_use]
    pub fn new(player: Arc<dyn AudioPlayer>) -> Self {
        Self { player }
    }

    pub fn play(&self, url: &str) {
        self.player.stop();
        if let Err(err) = self.player.play(url) {
            debug!(error = %err, url, "audio playback failed");
        }
    }

    pub fn cue(&self, cue: AudioCue) {
        self.play(cue.url());
    }

    pub fn stop(&self) {
        self.player.stop();
    }
}

/// Player for hosts without audio output.
///
/// Remembers the clip that would be playing and logs it.
#[derive(Debug, Default)]
pub struct SilentAudio {
    current: Mutex<Option<String>>,
}

impl SilentAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The clip that would currently be playing.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }
}

impl AudioPlayer for SilentAudio {
    fn stop(&self) {
        if let Ok(mut guard) = self.current.lock() {
            guard.take();
        }
    }

    fn play(&self, url: &str) -> Result<(), PlaybackError> {
        debug!(url, "play");
        let mut guard = self
            .current
            .lock()
            .map_err(|e| PlaybackError::Blocked(e.to_string()))?;
        *guard = Some(url.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct BlockedAudio {
        stops: Mutex<u32>,
    }

    impl AudioPlayer for BlockedAudio {
        fn stop(&self) {
            *self.stops.lock().unwrap() += 1;
        }

        fn play(&self, _url: &str) -> Result<(), PlaybackError> {
            Err(PlaybackError::Blocked("autoplay".into()))
        }
    }

    #[test]
    fn channel_replaces_current_clip() {
        let player = Arc::new(SilentAudio::new());
        let channel = AudioChannel::new(player.clone());
        channel.play("a.mp3");
        channel.cue(AudioCue::Correct);
        assert_eq!(player.current().as_deref(), Some(AudioCue::Correct.url()));
        channel.stop();
        assert!(player.current().is_none());
    }

    #[test]
    fn playback_errors_are_swallowed_after_stopping_previous_clip() {
        let player = Arc::new(BlockedAudio::default());
        let channel = AudioChannel::new(player.clone());
        channel.play("a.mp3");
        channel.play("b.mp3");
        assert_eq!(*player.stops.lock().unwrap(), 2);
    }
}
