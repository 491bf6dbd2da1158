//! Gesture scripts - recorded pointer streams for replay
//!
//! ```toml
//! keyguard_showing = false
//! end_ms = 800
//!
//! [display]
//! width = 1080
//! height = 2160
//!
//! [[event]]
//! action = "down"
//! x = 540
//! y = 2155
//! t_ms = 0
//! ```

use std::path::Path;

use serde::Deserialize;
use swipenav_core::prelude::*;
use swipenav_core::{DisplayInfo, PointerEvent};

/// Grace period after the last event so pending timers can fire
const END_GRACE_MS: u64 = 100;

/// A pointer stream with optional environment overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GestureScript {
    /// Display to use instead of the config's `[display]`
    #[serde(default)]
    pub display: Option<DisplayInfo>,

    /// Start with the keyguard showing
    #[serde(default)]
    pub keyguard_showing: bool,

    /// Stop replay at this time (ms after start)
    #[serde(default)]
    pub end_ms: Option<u64>,

    #[serde(default, rename = "event")]
    pub events: Vec<PointerEvent>,
}

impl GestureScript {
    /// Load and validate a script file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ScriptNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).context(format!("Failed to load script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let script: GestureScript = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if self.events.is_empty() {
            return Err(Error::script("script has no [[event]] entries"));
        }

        for pair in self.events.windows(2) {
            if pair[1].event_time_ms < pair[0].event_time_ms {
                return Err(Error::script(format!(
                    "event times must not decrease ({} after {})",
                    pair[1].event_time_ms, pair[0].event_time_ms
                )));
            }
        }

        if let (Some(end_ms), Some(last)) = (self.end_ms, self.events.last()) {
            if end_ms < last.event_time_ms {
                return Err(Error::script(format!(
                    "end_ms {} is before the last event at {}",
                    end_ms, last.event_time_ms
                )));
            }
        }

        Ok(())
    }

    /// When replay stops: `end_ms`, or the last event plus one timeout
    pub fn end_time_ms(&self, trigger_timeout_ms: u64) -> u64 {
        self.end_ms.unwrap_or_else(|| {
            let last = self.events.last().map(|e| e.event_time_ms).unwrap_or(0);
            last + trigger_timeout_ms + END_GRACE_MS
        })
    }
}
