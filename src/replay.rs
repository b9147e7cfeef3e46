//! Scripted touch sequences.
//!
//! A [`TouchScript`] is a JSON list of steps fed to a dispatcher in order,
//! used to reproduce gesture recognition issues without a touch screen.
//!
//! ```json
//! {
//!   "name": "tap",
//!   "steps": [
//!     { "step": "touch", "event": "down", "x": 100, "y": 100, "time_ms": 0 },
//!     { "step": "touch", "event": "up", "x": 100, "y": 100, "time_ms": 40 }
//!   ]
//! }
//! ```

use crate::input::{TouchInput, TouchInputDispatcher};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Deliver a raw touch event
    Touch {
        event: TouchInput,
        x: f32,
        y: f32,
        time_ms: i64,
        #[serde(default)]
        pointer: i32,
        #[serde(default)]
        size: f32,
    },
    /// Refresh a pointer's coordinates
    Update {
        #[serde(default)]
        pointer: i32,
        x: f32,
        y: f32,
        time_ms: i64,
        #[serde(default)]
        size: f32,
    },
    /// Change the screen density
    Dpi { value: f32 },
    /// Sleep, giving the hold timer a chance to fire
    Wait { ms: u64 },
}

impl std::fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayStep::Touch {
                event,
                x,
                y,
                time_ms,
                pointer,
                ..
            } => write!(f, "{} #{} ({}, {}) @{}ms", event, pointer, x, y, time_ms),
            ReplayStep::Update {
                pointer,
                x,
                y,
                time_ms,
                ..
            } => write!(f, "Update #{} ({}, {}) @{}ms", pointer, x, y, time_ms),
            ReplayStep::Dpi { value } => write!(f, "DPI {}", value),
            ReplayStep::Wait { ms } => write!(f, "Wait {}ms", ms),
        }
    }
}

/// A named sequence of replay steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchScript {
    /// Optional label shown in logs
    #[serde(default)]
    pub name: Option<String>,
    /// Steps in delivery order
    pub steps: Vec<ReplayStep>,
}

/// Outcome of playing a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Steps the dispatcher accepted
    pub applied: usize,
    /// Steps the dispatcher rejected
    pub rejected: usize,
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} applied, {} rejected", self.applied, self.rejected)
    }
}

impl TouchScript {
    /// Parse a script from JSON.
    pub fn from_json_str(content: &str) -> Result<Self, ReplayError> {
        let script: TouchScript =
            serde_json::from_str(content).map_err(|e| ReplayError::ParseError(e.to_string()))?;
        if script.steps.is_empty() {
            return Err(ReplayError::EmptyScript);
        }
        Ok(script)
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ReplayError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Serialize the script as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ReplayError> {
        serde_json::to_string_pretty(self).map_err(|e| ReplayError::SerializeError(e.to_string()))
    }

    /// Feed every step to `dispatcher` in order.
    pub fn play(&self, dispatcher: &TouchInputDispatcher) -> ReplaySummary {
        tracing::info!(
            name = self.name.as_deref().unwrap_or("unnamed"),
            steps = self.steps.len(),
            "Replaying touch script"
        );

        let mut summary = ReplaySummary::default();
        for step in &self.steps {
            let accepted = match *step {
                ReplayStep::Touch {
                    event,
                    x,
                    y,
                    time_ms,
                    pointer,
                    size,
                } => dispatcher.handle_touch_input(
                    event,
                    x,
                    y,
                    time_ms.saturating_mul(NANOS_PER_MILLI),
                    pointer,
                    size,
                ),
                ReplayStep::Update {
                    pointer,
                    x,
                    y,
                    time_ms,
                    size,
                } => dispatcher.update_touch_pointer(
                    pointer,
                    x,
                    y,
                    time_ms.saturating_mul(NANOS_PER_MILLI),
                    size,
                ),
                ReplayStep::Dpi { value } => dispatcher.set_screen_dpi(value),
                ReplayStep::Wait { ms } => {
                    std::thread::sleep(Duration::from_millis(ms));
                    true
                }
            };

            if accepted {
                summary.applied += 1;
            } else {
                tracing::debug!(%step, "Step rejected");
                summary.rejected += 1;
            }
        }

        tracing::info!(%summary, "Replay finished");
        summary
    }
}

/// Errors loading a touch script.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Script file could not be read
    #[error("Failed to read touch script: {0}")]
    IoError(String),

    /// Script is not valid JSON
    #[error("Failed to parse touch script: {0}")]
    ParseError(String),

    /// Script could not be written out
    #[error("Failed to serialize touch script: {0}")]
    SerializeError(String),

    /// Script has no steps
    #[error("Touch script has no steps")]
    EmptyScript,
}
