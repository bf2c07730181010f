use std::collections::{HashMap, HashSet};

use glam::Vec2;
use raystage_interaction::PointerInput;
use tracing::warn;

use crate::config::{BindingOverrides, ControlsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Select,
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    ToggleLights,
}

/// Key identifiers delivered by whatever frontend feeds the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    KeyE,
    KeyL,
    KeyM,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

/// Keys held down during one tick.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub keys_pressed: HashSet<Key>,
}

/// Pointer and stage actions derived from one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionState {
    pub select_held: bool,
    pub select_pressed: bool,
    pub select_released: bool,
    pub rotate: Vec2,
    pub lights_pressed: bool,
}

impl ActionState {
    pub fn pointer_input(&self) -> PointerInput {
        PointerInput {
            select_pressed: self.select_pressed,
            select_released: self.select_released,
            rotate: self.rotate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bindings {
    map: HashMap<Action, Vec<Key>>,
}

impl Bindings {
    pub fn from_config(config: &ControlsConfig) -> Self {
        let mut map = HashMap::new();
        for (action, keys) in default_bindings() {
            map.insert(action, keys);
        }
        apply_overrides(&mut map, &config.bindings);
        Self { map }
    }

    fn keys_for(&self, action: &Action) -> Option<&[Key]> {
        self.map.get(action).map(|v| v.as_slice())
    }
}

#[derive(Debug)]
pub struct InputProcessor {
    bindings: Bindings,
    prev_keys: HashSet<Key>,
}

impl InputProcessor {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            bindings: Bindings::from_config(config),
            prev_keys: HashSet::new(),
        }
    }

    pub fn process(&mut self, snapshot: &InputSnapshot) -> ActionState {
        let state = ActionState {
            select_held: self.action_active(Action::Select, snapshot),
            select_pressed: self.action_triggered(Action::Select, snapshot),
            select_released: self.action_released(Action::Select, snapshot),
            rotate: Vec2::new(
                axis_value(
                    &self.bindings,
                    Action::RotateRight,
                    Action::RotateLeft,
                    snapshot,
                ),
                axis_value(
                    &self.bindings,
                    Action::RotateUp,
                    Action::RotateDown,
                    snapshot,
                ),
            ),
            lights_pressed: self.action_triggered(Action::ToggleLights, snapshot),
        };

        self.prev_keys = snapshot.keys_pressed.clone();

        state
    }

    fn action_active(&self, action: Action, snapshot: &InputSnapshot) -> bool {
        self.bindings
            .keys_for(&action)
            .map(|keys| keys.iter().any(|key| snapshot.keys_pressed.contains(key)))
            .unwrap_or(false)
    }

    fn action_triggered(&self, action: Action, snapshot: &InputSnapshot) -> bool {
        self.bindings
            .keys_for(&action)
            .map(|keys| {
                keys.iter().any(|key| {
                    snapshot.keys_pressed.contains(key) && !self.prev_keys.contains(key)
                })
            })
            .unwrap_or(false)
    }

    fn action_released(&self, action: Action, snapshot: &InputSnapshot) -> bool {
        self.bindings
            .keys_for(&action)
            .map(|keys| {
                keys.iter().any(|key| {
                    !snapshot.keys_pressed.contains(key) && self.prev_keys.contains(key)
                })
            })
            .unwrap_or(false)
    }
}

fn axis_value(bindings: &Bindings, positive: Action, negative: Action, snapshot: &InputSnapshot) -> f32 {
    let pos = bindings
        .keys_for(&positive)
        .map(|keys| keys.iter().any(|key| snapshot.keys_pressed.contains(key)))
        .unwrap_or(false);
    let neg = bindings
        .keys_for(&negative)
        .map(|keys| keys.iter().any(|key| snapshot.keys_pressed.contains(key)))
        .unwrap_or(false);

    (pos as i32 - neg as i32) as f32
}

fn default_bindings() -> Vec<(Action, Vec<Key>)> {
    vec![
        (Action::Select, vec![Key::Space]),
        (Action::RotateLeft, vec![Key::ArrowLeft]),
        (Action::RotateRight, vec![Key::ArrowRight]),
        (Action::RotateUp, vec![Key::ArrowUp]),
        (Action::RotateDown, vec![Key::ArrowDown]),
        (Action::ToggleLights, vec![Key::KeyL]),
    ]
}

fn apply_overrides(map: &mut HashMap<Action, Vec<Key>>, overrides: &BindingOverrides) {
    for (action_name, tokens) in &overrides.actions {
        if let Some(action) = parse_action(action_name) {
            map.insert(action, parse_keys(tokens));
        } else {
            warn!("Unknown action '{}' in bindings", action_name);
        }
    }
}

fn parse_keys(tokens: &[String]) -> Vec<Key> {
    tokens
        .iter()
        .filter_map(|token| {
            parse_key(token).or_else(|| {
                warn!("Unknown binding token '{}'; ignoring", token);
                None
            })
        })
        .collect()
}

fn parse_key(token: &str) -> Option<Key> {
    Some(match token {
        "Space" => Key::Space,
        "KeyE" => Key::KeyE,
        "KeyL" => Key::KeyL,
        "KeyM" => Key::KeyM,
        "ArrowLeft" => Key::ArrowLeft,
        "ArrowRight" => Key::ArrowRight,
        "ArrowUp" => Key::ArrowUp,
        "ArrowDown" => Key::ArrowDown,
        _ => return None,
    })
}

fn parse_action(name: &str) -> Option<Action> {
    match name {
        "Select" => Some(Action::Select),
        "RotateLeft" => Some(Action::RotateLeft),
        "RotateRight" => Some(Action::RotateRight),
        "RotateUp" => Some(Action::RotateUp),
        "RotateDown" => Some(Action::RotateDown),
        "ToggleLights" => Some(Action::ToggleLights),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(keys: &[Key]) -> InputSnapshot {
        InputSnapshot {
            keys_pressed: keys.iter().copied().collect(),
        }
    }

    #[test]
    fn select_edges_are_derived_from_key_transitions() {
        let config = ControlsConfig::default();
        let mut processor = InputProcessor::new(&config);

        let state = processor.process(&snapshot(&[Key::Space]));
        assert!(state.select_pressed);
        assert!(state.select_held);
        assert!(!state.select_released);

        let state = processor.process(&snapshot(&[Key::Space]));
        assert!(!state.select_pressed);
        assert!(state.select_held);

        let state = processor.process(&snapshot(&[]));
        assert!(!state.select_held);
        assert!(state.select_released);
    }

    #[test]
    fn rotate_keys_fold_into_axes() {
        let config = ControlsConfig::default();
        let mut processor = InputProcessor::new(&config);

        let state = processor.process(&snapshot(&[Key::ArrowRight, Key::ArrowUp]));
        assert_eq!(state.rotate, Vec2::new(1.0, 1.0));

        let state = processor.process(&snapshot(&[Key::ArrowLeft]));
        assert_eq!(state.rotate, Vec2::new(-1.0, 0.0));

        let state = processor.process(&snapshot(&[]));
        assert_eq!(state.rotate, Vec2::ZERO);
    }

    #[test]
    fn lights_fires_on_press_edge_only() {
        let config = ControlsConfig::default();
        let mut processor = InputProcessor::new(&config);

        assert!(processor.process(&snapshot(&[Key::KeyL])).lights_pressed);
        assert!(!processor.process(&snapshot(&[Key::KeyL])).lights_pressed);
        // Release never reports a lights event.
        assert!(!processor.process(&snapshot(&[])).lights_pressed);
    }

    #[test]
    fn overrides_replace_default_keys() {
        let mut config = ControlsConfig::default();
        config
            .bindings
            .actions
            .insert("Select".into(), vec!["KeyE".into()]);
        let mut processor = InputProcessor::new(&config);

        assert!(!processor.process(&snapshot(&[Key::Space])).select_held);
        assert!(processor.process(&snapshot(&[Key::KeyE])).select_held);
    }

    #[test]
    fn unknown_override_tokens_are_skipped() {
        let mut config = ControlsConfig::default();
        config
            .bindings
            .actions
            .insert("Select".into(), vec!["NoSuchKey".into(), "KeyE".into()]);
        config
            .bindings
            .actions
            .insert("NoSuchAction".into(), vec!["Space".into()]);
        let mut processor = InputProcessor::new(&config);

        assert!(processor.process(&snapshot(&[Key::KeyE])).select_held);
    }
}
