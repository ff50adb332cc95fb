//! Host configuration file
//!
//! ```json
//! {
//!   "timing": { "dropInterval": 300, "dasDelay": 120 },
//!   "seed": 42,
//!   "keys": { "HARD_DROP": "Enter", "LEFT": ["ArrowLeft", "h"] }
//! }
//! ```
//!
//! Every field is optional; missing timing values and key actions keep their defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use trixel_types::{KeyBindings, Timing};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timing: Timing,
    /// Fixed bag seed; the host picks one from the clock when absent
    pub seed: Option<u32>,
    /// Key overrides per action
    pub keys: KeyBindings,
}

/// Read the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
