use std::env;
use std::path::PathBuf;

/// Dwell per dialog item while topic/region lists are scanned (milliseconds).
pub const DEFAULT_ITEM_DWELL_MS: u64 = 3_000;
/// Dwell per keyboard row. Rows are announced with a longer description, so
/// they get more time than single keys.
pub const DEFAULT_ROW_DWELL_MS: u64 = 5_000;
/// Dwell per key inside a selected row.
pub const DEFAULT_KEY_DWELL_MS: u64 = 1_875;
/// Pause between a list prompt settling and the first item announcement.
pub const DEFAULT_LEAD_IN_MS: u64 = 3_000;
/// How long a spoken confirmation sentence is held before returning to the top.
pub const DEFAULT_CONFIRM_HOLD_MS: u64 = 5_000;
/// Hold after a committed keyboard token before row scanning restarts.
pub const DEFAULT_TOKEN_HOLD_MS: u64 = 3_750;
/// Hold after a row selection before its keys start scanning.
pub const DEFAULT_ROW_HOLD_MS: u64 = 1_250;
/// Debounce window for the switch channel.
pub const DEFAULT_COOLDOWN_MS: u64 = 300;
/// Inactivity bound before scanning resets to the top level.
pub const DEFAULT_INACTIVITY_MS: u64 = 37_500;
/// Hard ceiling on waiting for any single narration to settle.
pub const DEFAULT_SPEECH_TIMEOUT_MS: u64 = 10_000;
/// Synthetic narration pacing while muted (per character, plus a floor).
pub const DEFAULT_SYNTH_MS_PER_CHAR: u64 = 55;
pub const DEFAULT_SYNTH_FLOOR_MS: u64 = 400;

pub const MIN_DWELL_MS: u64 = 250;
pub const MAX_DWELL_MS: u64 = 30_000;
pub const MIN_COOLDOWN_MS: u64 = 50;
pub const MAX_COOLDOWN_MS: u64 = 5_000;
pub const MAX_HOLD_MS: u64 = 60_000;
pub const MAX_INACTIVITY_MS: u64 = 600_000;
pub const MAX_SPEECH_TIMEOUT_MS: u64 = 120_000;

pub(super) fn default_narrator_cmd() -> String {
    if cfg!(target_os = "macos") {
        "say -v Anna".to_string()
    } else {
        "espeak-ng -v de".to_string()
    }
}

/// Per-user profile location. Falls back to the temp dir when no home
/// directory is available (containers, stripped-down service accounts).
pub(super) fn default_profile_path() -> PathBuf {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return PathBuf::from(home)
                .join(".augenblick")
                .join("profile.json");
        }
    }
    env::temp_dir().join("augenblick_profile.json")
}
