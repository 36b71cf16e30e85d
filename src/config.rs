use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::schedule::slot_utils::DEFAULT_STEP_MINUTES;
use crate::schedule::TieBreak;
use crate::stats::WinRateBasis;

/// Knobs of one scheduling session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub step_minutes: u32,
    pub tie_break: TieBreak,
    pub win_rate: WinRateBasis,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            tie_break: TieBreak::ByName,
            win_rate: WinRateBasis::Games,
        }
    }
}

impl SchedulerConfig {
    /// Loads a JSON config file; missing keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"tie_break": {"seeded": 42}}"#).unwrap();
        assert_eq!(config.tie_break, TieBreak::Seeded(42));
        assert_eq!(config.step_minutes, 30);
        assert_eq!(config.win_rate, WinRateBasis::Games);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"step_minutes": 15, "win_rate": "decided"}"#).unwrap();
        let config = SchedulerConfig::load(&path).unwrap();
        assert_eq!(config.step_minutes, 15);
        assert_eq!(config.win_rate, WinRateBasis::Decided);
        assert_eq!(config.tie_break, TieBreak::ByName);
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(SchedulerConfig::load(&path), Err(InputError::Json(_))));
    }
}
