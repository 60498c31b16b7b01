use serde::{Deserialize, Serialize};

/// Tunables for outline construction.
///
/// Every field has a default matching the editor's stock behaviour, so a
/// partial serialized config only needs to name the values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Angular tolerance (radians) under which a curved edge is drawn straight.
    pub straightness_tolerance: f64,
    /// Parameter step used when scanning a curve for the head position.
    pub arc_sample_step: f64,
    /// Lowest curve parameter the head scan may reach.
    pub arc_sample_floor: f64,
    /// Relative arc-length error accepted for the head position.
    pub arc_match_tolerance: f64,
    /// Elbow routing collapses to a straight pass-through when the endpoints
    /// are closer than `elbow_collapse_factor * width`.
    pub elbow_collapse_factor: f64,
    /// Elbow control points snap to an adjacent axis value closer than
    /// `snap_factor * width`.
    pub snap_factor: f64,
    /// Pen width used to outline the fill; the bounding rect is padded by half of it.
    pub pen_width: f64,
    /// Maximum deviation used when flattening curves for hit-testing.
    pub flatten_tolerance: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            straightness_tolerance: 0.1,
            arc_sample_step: 0.001,
            arc_sample_floor: 0.5,
            arc_match_tolerance: 0.05,
            elbow_collapse_factor: 2.0,
            snap_factor: 0.5,
            pen_width: 1.0,
            flatten_tolerance: 0.25,
        }
    }
}
