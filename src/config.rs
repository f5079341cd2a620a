use serde::{Deserialize, Serialize};

use crate::history::ClearPolicy;
use crate::input::InkInputPolicy;
use crate::tools::ToolSettings;

/// Engine configuration. Missing fields fall back to their defaults, so
/// configs written by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub input_policy: InkInputPolicy,
    pub clear_policy: ClearPolicy,
    pub tools: ToolSettings,
    /// Quiet period after a content edit before the note is saved.
    pub autosave_delay_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_policy: InkInputPolicy::default(),
            clear_policy: ClearPolicy::default(),
            tools: ToolSettings::default(),
            autosave_delay_secs: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
