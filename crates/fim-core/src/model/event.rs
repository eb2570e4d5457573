// Aggregate EPA statistics per event (`/api/eventData`).

use serde::{Deserialize, Serialize};

/// Strength-of-field statistics for one event. Metrics are null when the
/// server has no EPA data for the event's teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub event_name: String,
    #[serde(default)]
    pub teamcount: u32,
    #[serde(default)]
    pub maxepa: Option<f64>,
    #[serde(default)]
    pub top8epa: Option<f64>,
    #[serde(default)]
    pub top24epa: Option<f64>,
    #[serde(default)]
    pub avgepa: Option<f64>,
    #[serde(default)]
    pub medianepa: Option<f64>,
}
