//! Audio playback for the stage, with an optional rodio backend.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(feature = "audio_backend")]
mod backend {
    use super::*;
    use anyhow::Context;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::io::Cursor;

    /// Backend state for rodio audio.
    pub struct BackendState {
        /// Output stream (must be kept alive)
        pub _stream: OutputStream,
        /// Stream handle for creating sinks
        pub stream_handle: OutputStreamHandle,
        /// Active playback sink
        pub sink: Option<Sink>,
    }

    impl BackendState {
        pub fn new() -> Result<Self> {
            let (stream, stream_handle) =
                OutputStream::try_default().context("Failed to create audio output stream")?;

            Ok(Self {
                _stream: stream,
                stream_handle,
                sink: None,
            })
        }

        pub fn play(&mut self, data: &[u8], volume: f32) -> Result<()> {
            self.stop();

            let cursor = Cursor::new(data.to_vec());
            let source = Decoder::new(cursor).context("Failed to decode audio")?;

            let sink = Sink::try_new(&self.stream_handle).context("Failed to create audio sink")?;
            sink.set_volume(volume);
            sink.append(source);
            self.sink = Some(sink);

            Ok(())
        }

        pub fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }

        pub fn set_volume(&self, volume: f32) {
            if let Some(sink) = &self.sink {
                sink.set_volume(volume);
            }
        }
    }
}

#[cfg(not(feature = "audio_backend"))]
mod backend {
    use super::*;

    /// Backend state stub when rodio is not available.
    pub struct BackendState;

    impl BackendState {
        pub fn new() -> Result<Self> {
            debug!("Audio backend: stub (no rodio)");
            Ok(Self)
        }

        pub fn play(&mut self, _data: &[u8], _volume: f32) -> Result<()> {
            Ok(())
        }

        pub fn stop(&mut self) {}

        pub fn set_volume(&self, _volume: f32) {}
    }
}

use backend::BackendState;

/// Plays one loaded track with idempotent start/stop.
///
/// The logical playing state is tracked here so toggling behaves the same
/// with or without a real output device; the backend only does output.
pub struct AudioPlayer {
    backend: Option<BackendState>,
    track: Option<Arc<Vec<u8>>>,
    volume: f32,
    playing: bool,
}

impl AudioPlayer {
    /// Create a player, falling back to a stub if the device fails.
    pub fn new() -> Self {
        let backend = match BackendState::new() {
            Ok(backend) => {
                debug!("Audio player initialized");
                Some(backend)
            }
            Err(err) => {
                warn!("Failed to initialize audio: {err}. Using stub.");
                None
            }
        };

        Self {
            backend,
            track: None,
            volume: 1.0,
            playing: false,
        }
    }

    /// Create a player that never touches an output device.
    ///
    /// Useful for testing or headless operation.
    pub fn stub() -> Self {
        Self {
            backend: None,
            track: None,
            volume: 1.0,
            playing: false,
        }
    }

    /// Whether a real output device is available.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Load the track to play; replaces any previously loaded track.
    pub fn load_track(&mut self, data: Vec<u8>) {
        self.track = Some(Arc::new(data));
        debug!("Loaded audio track ({} bytes)", self.track.as_ref().map_or(0, |t| t.len()));
    }

    /// Whether a track has been loaded.
    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    /// Set playback volume (0.0 to 1.0), applied to active playback too.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(backend) = &self.backend {
            backend.set_volume(self.volume);
        }
    }

    /// Start playback. No-op if already playing.
    pub fn play(&mut self) {
        if self.playing {
            return;
        }

        match (&mut self.backend, &self.track) {
            (Some(backend), Some(track)) => {
                if let Err(err) = backend.play(track, self.volume) {
                    warn!("Failed to start audio playback: {err}");
                }
            }
            (_, None) => debug!("No audio track loaded; playback is silent"),
            (None, _) => {}
        }
        self.playing = true;
    }

    /// Stop playback. No-op if already stopped.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }

        if let Some(backend) = &mut self.backend {
            backend.stop();
        }
        self.playing = false;
    }

    /// Whether playback is logically active.
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::stub()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_player_has_no_device() {
        let player = AudioPlayer::stub();
        assert!(!player.is_available());
        assert!(!player.is_playing());
    }

    #[test]
    fn play_and_stop_are_idempotent() {
        let mut player = AudioPlayer::stub();
        player.play();
        player.play();
        assert!(player.is_playing());

        player.stop();
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn loading_a_track_is_reflected_and_replaceable() {
        let mut player = AudioPlayer::stub();
        assert!(!player.has_track());

        player.load_track(vec![1, 2, 3]);
        assert!(player.has_track());

        // Playback without a device still toggles the logical state.
        player.play();
        assert!(player.is_playing());
    }

    #[test]
    fn volume_is_clamped() {
        let mut player = AudioPlayer::stub();
        player.set_volume(3.0);
        assert_eq!(player.volume, 1.0);
        player.set_volume(-1.0);
        assert_eq!(player.volume, 0.0);
    }
}
