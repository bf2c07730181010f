use anyhow::Result;
use raystage_core::Hand;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

const DEFAULT_CONTROLS_PATH: &str = "config/controls.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Use the right-hand controller for the pointer ray.
    pub use_right_hand: bool,
    /// Maximum pointer ray length in meters.
    pub raycast_distance: f32,
    /// Rotate input magnitude below which input is treated as zero.
    pub rotate_deadzone: f32,
    /// Rotation speed in degrees per second at full deflection.
    pub rotate_sensitivity: f32,
    /// Offset above the hit surface for spawned instances.
    pub spawn_surface_offset: f32,
    /// Master volume (0.0 to 1.0).
    pub master_volume: f32,
    /// Stage music volume (0.0 to 1.0).
    pub music_volume: f32,
    /// Whether audio is muted.
    pub audio_muted: bool,
    /// Track file to load for stage playback, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_track: Option<PathBuf>,
    pub bindings: BindingOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BindingOverrides {
    pub actions: HashMap<String, Vec<String>>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            use_right_hand: true,
            raycast_distance: 100.0,
            rotate_deadzone: 0.1,
            rotate_sensitivity: 100.0,
            spawn_surface_offset: 0.01,
            master_volume: 1.0,
            music_volume: 0.5,
            audio_muted: false,
            music_track: None,
            bindings: BindingOverrides::default(),
        }
    }
}

impl ControlsConfig {
    /// Load controls configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONTROLS_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ControlsConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ControlsConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONTROLS_PATH) {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Controls config not found at {}. Using defaults",
                        path.display()
                    );
                }
                ControlsConfig::default()
            }
        }
    }

    /// Save controls configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Path::new(DEFAULT_CONTROLS_PATH))
    }

    /// Save controls configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// The hand driving the pointer ray.
    pub fn active_hand(&self) -> Hand {
        if self.use_right_hand {
            Hand::Right
        } else {
            Hand::Left
        }
    }

    /// Music volume after applying master volume and mute.
    pub fn effective_music_volume(&self) -> f32 {
        if self.audio_muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("raystage_{name}_{timestamp}.toml"))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = ControlsConfig::load_from_path(Path::new("/nonexistent/controls.toml"));
        assert!(cfg.use_right_hand);
        assert_eq!(cfg.raycast_distance, 100.0);
        assert_eq!(cfg.rotate_deadzone, 0.1);
    }

    #[test]
    fn garbled_file_falls_back_to_defaults() {
        let path = temp_path("garbled");
        fs::write(&path, "not { valid toml").expect("write garbled config");

        let cfg = ControlsConfig::load_from_path(&path);
        assert_eq!(cfg.rotate_sensitivity, 100.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let path = temp_path("roundtrip");
        let mut cfg = ControlsConfig::default();
        cfg.use_right_hand = false;
        cfg.raycast_distance = 25.0;
        cfg.music_track = Some(PathBuf::from("assets/music.ogg"));
        cfg.bindings
            .actions
            .insert("Select".into(), vec!["KeyE".into()]);
        cfg.save_to_path(&path).expect("save config");

        let loaded = ControlsConfig::load_from_path(&path);
        assert!(!loaded.use_right_hand);
        assert_eq!(loaded.raycast_distance, 25.0);
        assert_eq!(loaded.active_hand(), Hand::Left);
        assert_eq!(loaded.music_track, Some(PathBuf::from("assets/music.ogg")));
        assert_eq!(
            loaded.bindings.actions.get("Select"),
            Some(&vec!["KeyE".to_string()])
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn muted_audio_silences_music() {
        let mut cfg = ControlsConfig::default();
        cfg.audio_muted = true;
        assert_eq!(cfg.effective_music_volume(), 0.0);

        cfg.audio_muted = false;
        assert_eq!(cfg.effective_music_volume(), 0.5);
    }
}
