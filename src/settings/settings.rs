use linebar::{DisplayOptions, Unit};
use serde::{Deserialize, Serialize};

/// Defaults applied to every bar the CLI draws, overridable per command.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub display: DisplayOptions,
    pub unit: Unit,
    /// Pause between two demo steps.
    pub delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display: DisplayOptions::all(),
            unit: Unit::Bytes,
            delay_ms: 1,
        }
    }
}
