//! Stage lighting and audio toggle.
//!
//! An independent two-state feature: a discrete "lights" press flips between
//! lights-off and lights-on, activating a stage light and starting or
//! stopping audio playback. Releases never reach the controller; the input
//! layer only reports the press edge.

mod audio;

pub use audio::AudioPlayer;

use tracing::{info, warn};

/// A toggleable stage light owned by the controller.
#[derive(Debug, Clone)]
pub struct StageLight {
    /// Display name used in logs.
    pub name: String,
    active: bool,
}

impl StageLight {
    /// Create an inactive light.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }

    /// Whether the light is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Two-state toggle driving a light and an audio player together.
///
/// The initial state is lights-off regardless of input history.
pub struct StageController {
    lights_on: bool,
    light: Option<StageLight>,
    audio: AudioPlayer,
}

impl StageController {
    /// Create a controller; outputs are reconciled to lights-off.
    ///
    /// A missing light is a degraded configuration, not an error: the toggle
    /// still drives audio.
    pub fn new(light: Option<StageLight>, audio: AudioPlayer) -> Self {
        if light.is_none() {
            warn!("Stage light not configured; toggle will only affect audio");
        }

        let mut controller = Self {
            lights_on: false,
            light,
            audio,
        };
        controller.reconcile();
        controller
    }

    /// Handle the lights input press edge: flip the state and reconcile.
    pub fn handle_lights_pressed(&mut self) {
        self.lights_on = !self.lights_on;
        info!("Lights are now: {}", if self.lights_on { "ON" } else { "OFF" });
        self.reconcile();
    }

    /// Whether the stage is currently in the lights-on state.
    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    /// The owned light, if configured.
    pub fn light(&self) -> Option<&StageLight> {
        self.light.as_ref()
    }

    /// The owned audio player.
    pub fn audio(&self) -> &AudioPlayer {
        &self.audio
    }

    /// Mutable access to the audio player (volume, track loading).
    pub fn audio_mut(&mut self) -> &mut AudioPlayer {
        &mut self.audio
    }

    fn reconcile(&mut self) {
        if let Some(light) = &mut self.light {
            light.set_active(self.lights_on);
        }
        if self.lights_on {
            self.audio.play();
        } else {
            self.audio.stop();
        }
    }
}
