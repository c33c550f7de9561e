//! Local persistence: the per-user profile and completed-selection records.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::log_debug;

/// Per-user flags that survive restarts. Only the keyboard intro flag lives
/// here today; defaults keep old profiles readable when fields are added.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub keyboard_intro_heard: bool,
}

impl Profile {
    /// Missing or unreadable profiles fall back to defaults; a corrupt file
    /// must never block the interaction loop.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log_debug(&format!("profile unreadable, using defaults: {err}"));
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self).context("failed to encode profile")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write profile '{}'", path.display()))
    }
}

/// A finalized selection, emitted when a dialog reaches its confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub recorded_at: u64,
    pub dialog: String,
    pub main_region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

impl SelectionRecord {
    pub fn now(
        dialog: &str,
        main_region: &str,
        sub_region: Option<&str>,
        intensity: Option<u8>,
    ) -> Self {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            recorded_at,
            dialog: dialog.to_string(),
            main_region: main_region.to_string(),
            sub_region: sub_region.map(str::to_string),
            intensity,
        }
    }
}

/// External persistence hook for completed selections.
pub trait SelectionSink: Send {
    fn record(&mut self, record: &SelectionRecord) -> Result<()>;
}

/// Appends one JSON object per selection, newline-delimited.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SelectionSink for JsonlSink {
    fn record(&mut self, record: &SelectionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open records '{}'", self.path.display()))?;
        let line = serde_json::to_string(record).context("failed to encode selection record")?;
        writeln!(file, "{line}").context("failed to append selection record")
    }
}

/// Discards everything; used when no records path is configured.
pub struct NullSink;

impl SelectionSink for NullSink {
    fn record(&mut self, _record: &SelectionRecord) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_defaults_to_unheard_intro() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile::load(&dir.path().join("absent.json"));
        assert!(!profile.keyboard_intro_heard);
    }

    #[test]
    fn profile_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.json");
        let profile = Profile {
            keyboard_intro_heard: true,
        };
        profile.save(&path).unwrap();
        assert!(Profile::load(&path).keyboard_intro_heard);
    }

    #[test]
    fn corrupt_profile_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, "not json").unwrap();
        assert!(!Profile::load(&path).keyboard_intro_heard);
    }

    #[test]
    fn jsonl_sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let mut sink = JsonlSink::new(path.clone());
        sink.record(&SelectionRecord::now("pain", "kopf", Some("stirn"), Some(3)))
            .unwrap();
        sink.record(&SelectionRecord::now("needs", "hygiene", Some("duschen"), None))
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: SelectionRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.main_region, "kopf");
        assert_eq!(first.intensity, Some(3));
        assert!(!lines[1].contains("intensity"), "None fields stay absent");
    }
}
