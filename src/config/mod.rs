//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use defaults::{default_narrator_cmd, default_profile_path};
pub use defaults::{
    DEFAULT_CONFIRM_HOLD_MS, DEFAULT_COOLDOWN_MS, DEFAULT_INACTIVITY_MS, DEFAULT_ITEM_DWELL_MS,
    DEFAULT_KEY_DWELL_MS, DEFAULT_LEAD_IN_MS, DEFAULT_ROW_DWELL_MS, DEFAULT_ROW_HOLD_MS,
    DEFAULT_SPEECH_TIMEOUT_MS, DEFAULT_SYNTH_FLOOR_MS, DEFAULT_SYNTH_MS_PER_CHAR,
    DEFAULT_TOKEN_HOLD_MS, MAX_DWELL_MS, MIN_DWELL_MS,
};

/// Which assessment dialog the binary runs when the keyboard is not selected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DialogKind {
    /// Pain localisation with a 1-10 intensity scale.
    Pain,
    /// Everyday needs picker (food, feelings, clothing, hygiene, movement).
    Needs,
}

/// CLI options for the scanning engine. Validated values keep the timing
/// contracts between narration, dwell, and the watchdog consistent.
#[derive(Debug, Parser, Clone)]
#[command(about = "Augenblick single-switch scanning interface", author, version)]
pub struct AppConfig {
    /// Assessment dialog to run
    #[arg(long, value_enum, default_value_t = DialogKind::Pain)]
    pub dialog: DialogKind,

    /// Run the two-level scanning keyboard instead of a dialog
    #[arg(long, default_value_t = false)]
    pub keyboard: bool,

    /// Print the keyboard layout and exit
    #[arg(long = "list-layout", default_value_t = false)]
    pub list_layout: bool,

    /// Dwell per dialog item (milliseconds)
    #[arg(long = "item-dwell-ms", default_value_t = DEFAULT_ITEM_DWELL_MS)]
    pub item_dwell_ms: u64,

    /// Dwell per keyboard row (milliseconds)
    #[arg(long = "row-dwell-ms", default_value_t = DEFAULT_ROW_DWELL_MS)]
    pub row_dwell_ms: u64,

    /// Dwell per key within a selected row (milliseconds)
    #[arg(long = "key-dwell-ms", default_value_t = DEFAULT_KEY_DWELL_MS)]
    pub key_dwell_ms: u64,

    /// Pause between a list prompt and the first item (milliseconds)
    #[arg(long = "lead-in-ms", default_value_t = DEFAULT_LEAD_IN_MS)]
    pub lead_in_ms: u64,

    /// Hold on a spoken confirmation before returning to the top (milliseconds)
    #[arg(long = "confirm-hold-ms", default_value_t = DEFAULT_CONFIRM_HOLD_MS)]
    pub confirm_hold_ms: u64,

    /// Hold after a committed keyboard token (milliseconds)
    #[arg(long = "token-hold-ms", default_value_t = DEFAULT_TOKEN_HOLD_MS)]
    pub token_hold_ms: u64,

    /// Hold after a row selection before keys scan (milliseconds)
    #[arg(long = "row-hold-ms", default_value_t = DEFAULT_ROW_HOLD_MS)]
    pub row_hold_ms: u64,

    /// Switch debounce window (milliseconds)
    #[arg(long = "cooldown-ms", env = "AUGENBLICK_COOLDOWN_MS", default_value_t = DEFAULT_COOLDOWN_MS)]
    pub cooldown_ms: u64,

    /// Inactivity bound before scanning resets to the top (milliseconds)
    #[arg(long = "inactivity-ms", default_value_t = DEFAULT_INACTIVITY_MS)]
    pub inactivity_ms: u64,

    /// Hard timeout for any single narration (milliseconds)
    #[arg(long = "speech-timeout-ms", default_value_t = DEFAULT_SPEECH_TIMEOUT_MS)]
    pub speech_timeout_ms: u64,

    /// Disable audible narration; scanning keeps narration-equivalent pacing
    #[arg(long, default_value_t = false)]
    pub muted: bool,

    /// External narrator command line, e.g. "espeak-ng -v de" or "say -v Anna"
    #[arg(long = "narrator-cmd", env = "AUGENBLICK_NARRATOR", default_value_t = default_narrator_cmd())]
    pub narrator_cmd: String,

    /// Synthetic narration pacing while muted (milliseconds per character)
    #[arg(long = "synth-ms-per-char", default_value_t = DEFAULT_SYNTH_MS_PER_CHAR)]
    pub synth_ms_per_char: u64,

    /// Named pipe delivering blink events (one line per detected blink)
    #[arg(long = "blink-pipe", env = "AUGENBLICK_BLINK_PIPE")]
    pub blink_pipe: Option<PathBuf>,

    /// Per-user profile file (stores the keyboard intro flag)
    #[arg(long = "profile-path", env = "AUGENBLICK_PROFILE", default_value_os_t = default_profile_path())]
    pub profile_path: PathBuf,

    /// Append completed selections as JSON lines to this file
    #[arg(long = "records-path", env = "AUGENBLICK_RECORDS")]
    pub records_path: Option<PathBuf>,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "AUGENBLICK_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "AUGENBLICK_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging narration text and typed content (debug log only)
    #[arg(
        long = "log-content",
        env = "AUGENBLICK_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}
