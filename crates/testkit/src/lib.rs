#![warn(missing_docs)]
//! Deterministic testing surfaces: an event stream sink and a recording
//! capability handler for callback-order assertions.

use anyhow::Result;
use raystage_core::{RayHit, SimTick};
use raystage_interaction::{FrameCtx, InteractionHandler, SpawnRequest};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Primary event record captured by headless runs and tests.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// One capability callback observed by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityCall {
    /// `on_hover_enter` on the named prop, with the hit point.
    HoverEnter {
        /// Prop tag given at registration.
        name: String,
        /// Hit point passed to the callback.
        point: [f32; 3],
    },
    /// `on_hover_exit` on the named prop.
    HoverExit {
        /// Prop tag given at registration.
        name: String,
    },
    /// `on_select_enter` on the named prop, with the hit snapshot point.
    SelectEnter {
        /// Prop tag given at registration.
        name: String,
        /// Hit point passed to the callback.
        point: [f32; 3],
    },
    /// `on_select_exit` on the named prop.
    SelectExit {
        /// Prop tag given at registration.
        name: String,
    },
}

/// Shared, ordered log of capability calls across all recording handlers in
/// a scene.
pub type CallLog = Arc<Mutex<Vec<CapabilityCall>>>;

/// Create an empty shared call log.
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Capability handler that records every callback into a shared log.
///
/// Register one per prop under test, all sharing the same log, then assert
/// on the observed call order.
pub struct RecordingHandler {
    name: String,
    log: CallLog,
}

impl RecordingHandler {
    /// Create a handler tagged `name` that records into `log`.
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }

    fn push(&self, call: CapabilityCall) {
        if let Ok(mut log) = self.log.lock() {
            log.push(call);
        }
    }
}

impl InteractionHandler for RecordingHandler {
    fn on_hover_enter(&mut self, hit: &RayHit) {
        self.push(CapabilityCall::HoverEnter {
            name: self.name.clone(),
            point: hit.point.to_array(),
        });
    }

    fn on_hover_exit(&mut self) {
        self.push(CapabilityCall::HoverExit {
            name: self.name.clone(),
        });
    }

    fn on_select_enter(&mut self, _ctx: &FrameCtx, hit: &RayHit) -> Option<SpawnRequest> {
        self.push(CapabilityCall::SelectEnter {
            name: self.name.clone(),
            point: hit.point.to_array(),
        });
        None
    }

    fn on_select_exit(&mut self) {
        self.push(CapabilityCall::SelectExit {
            name: self.name.clone(),
        });
    }
}

/// Drain the shared log into a plain vector for assertions.
pub fn drain_calls(log: &CallLog) -> Vec<CapabilityCall> {
    log.lock().map(|mut calls| calls.drain(..).collect()).unwrap_or_default()
}
