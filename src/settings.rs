//! Game settings and calibration
//!
//! Persisted as JSON next to the executable. Every field carries a serde
//! default so a hand-edited partial file still loads.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sensor and calibration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Serial port the sensor board is attached to
    pub serial_port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Gain level of ambient silence; only gain above this counts as a shout
    pub calibration: f32,
    /// Divisor applied to gain above the calibration floor
    pub gain_divisor: f32,
    /// Fallback frequency divider when the sensor does not report one
    pub charge_divider: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            serial_port: "COM13".to_string(),
            baud_rate: 115_200,
            calibration: 70.0,
            gain_divisor: 1.5,
            charge_divider: 1000.0,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("unreadable settings file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)
    }
}
