//! Presentation-only ray feedback.

use glam::Vec3;

/// Sink for pointer-ray visuals: a line from the controller and an optional
/// hit-point indicator.
///
/// Implementations render; they never feed state back into the tracker.
pub trait RayVisual {
    /// Update the ray line. `hit` distinguishes a truncated-at-surface line
    /// from a full-length miss line.
    fn set_line(&mut self, from: Vec3, to: Vec3, hit: bool);

    /// Place and show the hit-point indicator.
    fn show_indicator(&mut self, at: Vec3);

    /// Hide the hit-point indicator.
    fn hide_indicator(&mut self);
}

/// Plain value implementation holding the latest visual state for a renderer
/// (or a test) to consume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineIndicator {
    /// Line start point.
    pub from: Vec3,
    /// Line end point.
    pub to: Vec3,
    /// Whether the line ends on a surface.
    pub hit: bool,
    /// Indicator position while shown.
    pub indicator: Option<Vec3>,
}

impl RayVisual for LineIndicator {
    fn set_line(&mut self, from: Vec3, to: Vec3, hit: bool) {
        self.from = from;
        self.to = to;
        self.hit = hit;
    }

    fn show_indicator(&mut self, at: Vec3) {
        self.indicator = Some(at);
    }

    fn hide_indicator(&mut self) {
        self.indicator = None;
    }
}
