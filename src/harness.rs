use crate::config::ControlsConfig;
use crate::input::{ActionState, InputProcessor, InputSnapshot, Key};
use crate::scripted_input::{ScriptedInputPlayer, ScriptedPose};
use anyhow::{Context, Result};
use glam::Vec3;
use raystage_core::{CameraRig, Collider, LayerMask, SimTick, Transform};
use raystage_interaction::{
    DummyHandler, HeadFollower, LineIndicator, MaterialId, MaterialSet, PointerTracker, Prop,
    PropInteractable, PropScene, Prototype, RayVisual, TrackerConfig,
};
use raystage_stage::{AudioPlayer, StageController, StageLight};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

const TICK_SECONDS: f32 = 1.0 / 72.0;
const DEFAULT_MAX_TICKS: u64 = 72 * 10;

pub struct HarnessConfig {
    pub controls: Arc<ControlsConfig>,
    pub script: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub event_log: Option<PathBuf>,
    pub no_audio: bool,
}

/// One line of the run's event log, written as newline-delimited JSON.
#[derive(Debug, Serialize)]
struct RunEvent<'a> {
    tick: SimTick,
    kind: &'a str,
    detail: String,
}

struct EventLog {
    file: File,
}

impl EventLog {
    fn create(path: &PathBuf) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create event log {}", path.display()))?;
        Ok(Self { file })
    }

    fn write(&mut self, tick: SimTick, kind: &str, detail: String) -> Result<()> {
        let line = serde_json::to_string(&RunEvent { tick, kind, detail })?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

pub fn run(cfg: HarnessConfig) -> Result<()> {
    let mut scene = build_demo_scene(&cfg.controls);
    let mut rig = build_rig(&cfg.controls);
    let hand = cfg.controls.active_hand();
    let mut follower = HeadFollower::new(add_hud_panel(&mut scene));

    let tracker_config = TrackerConfig {
        max_distance: cfg.controls.raycast_distance,
        layer_mask: LayerMask::all(),
        deadzone: cfg.controls.rotate_deadzone,
        rotate_sensitivity: cfg.controls.rotate_sensitivity,
    };
    // A missing hand anchor disables the pointer feature but not the run;
    // the stage toggle keeps working.
    let mut tracker = match PointerTracker::new(&rig, hand, tracker_config) {
        Ok(tracker) => Some(tracker),
        Err(err) => {
            error!("Pointer disabled: {err}");
            None
        }
    };
    let mut visual = LineIndicator::default();

    let mut stage = build_stage(&cfg);

    let mut script = match &cfg.script {
        Some(path) => Some(
            ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load script {}", path.display()))?,
        ),
        None => None,
    };

    let mut log = match &cfg.event_log {
        Some(path) => Some(EventLog::create(path)?),
        None => None,
    };
    let mut processor = InputProcessor::new(&cfg.controls);

    let max_ticks = cfg.max_ticks.unwrap_or(DEFAULT_MAX_TICKS);
    let mut tick = SimTick::ZERO;
    let mut prev_hovered = None;
    let mut prev_selected = None;
    let mut prev_spawned = 0;

    info!(
        max_ticks,
        scripted = script.is_some(),
        "Harness run starting"
    );

    while tick.0 < max_ticks {
        let state = match &mut script {
            Some(player) => {
                let (pose, state) = player.advance(TICK_SECONDS);
                apply_scripted_pose(&mut rig, hand, &pose);
                if player.finished() && state == ActionState::default() {
                    info!(tick = tick.0, "Script finished");
                    break;
                }
                state
            }
            None => {
                aim_builtin_demo(&mut rig, hand, tick);
                processor.process(&builtin_demo_snapshot(tick))
            }
        };

        follower.tick(&rig, &mut scene);

        if let Some(tracker) = &mut tracker {
            tracker.tick(
                &rig,
                &mut scene,
                &state.pointer_input(),
                TICK_SECONDS,
                Some(&mut visual as &mut dyn RayVisual),
            );
        }

        if state.lights_pressed {
            stage.handle_lights_pressed();
            if let Some(log) = &mut log {
                log.write(
                    tick,
                    "lights",
                    format!("on={}", stage.lights_on()),
                )?;
            }
        }

        if let (Some(log), Some(tracker)) = (&mut log, &tracker) {
            if tracker.hovered() != prev_hovered {
                prev_hovered = tracker.hovered();
                log.write(tick, "hover", describe_prop(&scene, prev_hovered))?;
            }
            if tracker.selected() != prev_selected {
                prev_selected = tracker.selected();
                log.write(tick, "select", describe_prop(&scene, prev_selected))?;
            }
            if scene.spawned().len() != prev_spawned {
                prev_spawned = scene.spawned().len();
                log.write(tick, "spawn", format!("count={prev_spawned}"))?;
            }
        }

        tick = tick.advance(1);
    }

    info!(
        ticks = tick.0,
        spawned = scene.spawned().len(),
        lights_on = stage.lights_on(),
        "Harness run finished"
    );
    Ok(())
}

fn describe_prop(scene: &PropScene, handle: Option<u64>) -> String {
    match handle.and_then(|h| scene.get(h)) {
        Some(prop) => prop.name.clone(),
        None => "none".into(),
    }
}

fn build_rig(controls: &ControlsConfig) -> CameraRig {
    let hand_x = if controls.use_right_hand { 0.2 } else { -0.2 };
    CameraRig::new(Transform::new(Vec3::new(0.0, 1.7, 0.0))).with_hand(
        controls.active_hand(),
        Transform::new(Vec3::new(hand_x, 1.4, 0.0)),
    )
}

fn build_stage(cfg: &HarnessConfig) -> StageController {
    let mut audio = if cfg.no_audio {
        AudioPlayer::stub()
    } else {
        AudioPlayer::new()
    };
    audio.set_volume(cfg.controls.effective_music_volume());
    if let Some(path) = &cfg.controls.music_track {
        match fs::read(path) {
            Ok(data) => audio.load_track(data),
            Err(err) => warn!("Failed to read music track {}: {err}", path.display()),
        }
    }
    StageController::new(Some(StageLight::new("spotlights")), audio)
}

/// Status panel that trails the viewpoint. It carries an inert handler so it
/// blocks the ray instead of letting clicks pass through to props behind it.
fn add_hud_panel(scene: &mut PropScene) -> u64 {
    scene.add(
        Prop::new(
            "hud",
            Transform::default(),
            Collider::Box {
                half_extents: Vec3::new(0.3, 0.2, 0.01),
            },
        )
        .with_layers(LayerMask::DEFAULT)
        .with_handler(Box::new(DummyHandler)),
    )
}

fn build_demo_scene(controls: &ControlsConfig) -> PropScene {
    let mut scene = PropScene::new();

    let marker = Prototype {
        name: "marker".into(),
        collider: Collider::Sphere { radius: 0.05 },
        layers: LayerMask::DEFAULT,
    };
    let materials = MaterialSet {
        default: MaterialId(0),
        hovered: MaterialId(1),
        selected: MaterialId(2),
    };

    // Floor spans 10x10m with its top face at y=0.
    scene.add(
        Prop::new(
            "floor",
            Transform::new(Vec3::new(0.0, -0.05, 0.0)),
            Collider::Box {
                half_extents: Vec3::new(5.0, 0.05, 5.0),
            },
        )
        .with_layers(LayerMask::SURFACE)
        .with_handler(Box::new(
            PropInteractable::new("floor", materials)
                .with_prototype(marker.clone())
                .with_surface_offset(controls.spawn_surface_offset),
        )),
    );

    scene.add(
        Prop::new(
            "pedestal",
            Transform::new(Vec3::new(0.0, 0.5, -3.0)),
            Collider::Box {
                half_extents: Vec3::splat(0.5),
            },
        )
        .with_layers(LayerMask::INTERACTABLE)
        .with_handler(Box::new(
            PropInteractable::new("pedestal", materials)
                .with_prototype(marker)
                .with_surface_offset(controls.spawn_surface_offset),
        )),
    );

    // No prototype configured: selecting the orb highlights it and logs a
    // warning instead of spawning.
    scene.add(
        Prop::new(
            "orb",
            Transform::new(Vec3::new(2.0, 1.5, -3.0)),
            Collider::Sphere { radius: 0.3 },
        )
        .with_layers(LayerMask::INTERACTABLE)
        .with_handler(Box::new(PropInteractable::new("orb", materials))),
    );

    scene
}

fn apply_scripted_pose(rig: &mut CameraRig, hand: raystage_core::Hand, pose: &ScriptedPose) {
    let position = match pose.position {
        Some(p) => Vec3::from_array(p),
        None => rig
            .anchor(hand)
            .map(|t| t.position)
            .unwrap_or(Vec3::new(0.2, 1.4, 0.0)),
    };
    rig.set_hand(
        hand,
        Transform::from_yaw_pitch(position, pose.yaw_degrees, pose.pitch_degrees),
    );
}

/// Built-in demo aim, used when no input script is given: sweep the ray over
/// the scene for four seconds, then hold it on the pedestal.
fn aim_builtin_demo(rig: &mut CameraRig, hand: raystage_core::Hand, tick: SimTick) {
    let seconds = tick.0 as f32 * TICK_SECONDS;
    let (yaw, pitch) = if seconds < 4.0 {
        (-30.0 + 15.0 * seconds, -10.0)
    } else {
        (0.0, -10.0)
    };
    if let Some(anchor) = rig.anchor(hand) {
        let position = anchor.position;
        rig.set_hand(hand, Transform::from_yaw_pitch(position, yaw, pitch));
    }
}

/// Built-in demo keys: hold select over the pedestal while nudging rotation,
/// release, then hit the lights toggle once near the end.
fn builtin_demo_snapshot(tick: SimTick) -> InputSnapshot {
    let seconds = tick.0 as f32 * TICK_SECONDS;
    let mut snapshot = InputSnapshot::default();

    if (5.0..7.0).contains(&seconds) {
        snapshot.keys_pressed.insert(Key::Space);
        snapshot.keys_pressed.insert(Key::ArrowRight);
    }
    if (8.0..8.1).contains(&seconds) {
        snapshot.keys_pressed.insert(Key::KeyL);
    }

    snapshot
}
