//! High score persistence
//!
//! A single best-score record, stored as JSON next to the executable.
//! Load failures (missing file, bad JSON) fall back to the default record;
//! only save failures surface an error to the caller.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The single best run on record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    /// Player name attached to the record
    pub name: String,
    pub score: u32,
}

impl Default for BestScore {
    fn default() -> Self {
        Self {
            name: "Nobody".to_string(),
            score: 0,
        }
    }
}

impl BestScore {
    /// A run must strictly beat the record to replace it
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.score
    }

    /// Load the record from `path`, falling back to the default on any
    /// failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(record) => {
                    log::info!("loaded high score from {}", path.display());
                    record
                }
                Err(err) => {
                    log::warn!("unreadable high score file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no high score file at {}, starting fresh", path.display());
                Self::default()
            }
        }
    }

    /// Write the record to `path` as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifies_strictly_beats() {
        let record = BestScore {
            name: "Ada".to_string(),
            score: 40,
        };
        assert!(!record.qualifies(39));
        assert!(!record.qualifies(40));
        assert!(record.qualifies(41));
    }

    #[test]
    fn test_default_record_beaten_by_any_positive_score() {
        let record = BestScore::default();
        assert_eq!(record.score, 0);
        assert!(!record.qualifies(0));
        assert!(record.qualifies(1));
    }

    #[test]
    fn test_missing_file_loads_default() {
        let loaded = BestScore::load("/nonexistent/highscores.json");
        assert_eq!(loaded, BestScore::default());
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join("shout2play_highscore_test.json");
        let record = BestScore {
            name: "Grace".to_string(),
            score: 73,
        };
        record.save(&path).unwrap();
        assert_eq!(BestScore::load(&path), record);
        let _ = std::fs::remove_file(&path);
    }
}
