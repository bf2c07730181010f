use crate::input::ActionState;
use glam::Vec2;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptFile {
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptStep {
    duration: f32,
    #[serde(default)]
    aim_yaw: f32,
    #[serde(default)]
    aim_pitch: f32,
    #[serde(default)]
    hand_position: Option<[f32; 3]>,
    #[serde(default)]
    select: bool,
    #[serde(default)]
    lights: bool,
    #[serde(default)]
    rotate_x: f32,
    #[serde(default)]
    rotate_y: f32,
}

/// Pointer pose requested by the current script step.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedPose {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub position: Option<[f32; 3]>,
}

/// Replays pointer poses and button state from a JSON step file.
///
/// Each step holds its values for `duration` seconds; the final step holds
/// forever. Press and release edges are derived here from consecutive steps,
/// so a script only declares whether a button is down.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptStep>,
    index: usize,
    time_in_step: f32,
    prev_select: bool,
    prev_lights: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let file: ScriptFile = serde_json::from_str(&contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            prev_select: false,
            prev_lights: false,
        })
    }

    /// Whether the final step has been reached and fully played out.
    pub fn finished(&self) -> bool {
        self.index + 1 >= self.steps.len()
            && self.time_in_step >= self.steps[self.index].duration
    }

    pub fn advance(&mut self, dt: f32) -> (ScriptedPose, ActionState) {
        self.time_in_step += dt;
        while self.index + 1 < self.steps.len()
            && self.time_in_step >= self.steps[self.index].duration
        {
            self.time_in_step -= self.steps[self.index].duration;
            self.index += 1;
        }

        let step = self.steps[self.index].clone();

        let state = ActionState {
            select_held: step.select,
            select_pressed: step.select && !self.prev_select,
            select_released: !step.select && self.prev_select,
            rotate: Vec2::new(step.rotate_x, step.rotate_y),
            lights_pressed: step.lights && !self.prev_lights,
        };
        self.prev_select = step.select;
        self.prev_lights = step.lights;

        let pose = ScriptedPose {
            yaw_degrees: step.aim_yaw,
            pitch_degrees: step.aim_pitch,
            position: step.hand_position,
        };

        (pose, state)
    }
}
