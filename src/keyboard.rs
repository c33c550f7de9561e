//! Two-level scanning keyboard: rows first, then keys within the chosen row.
//!
//! Committing any token sends scanning back to row zero, never to the row it
//! came from, so the rhythm stays identical for every keystroke. The text
//! buffer survives inactivity resets and is only gone when the keyboard
//! session ends.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::keyboard as layout;
use crate::engine::{DialogFlow, FlowCommand};
use crate::log_debug;
use crate::scan::{ItemKind, ItemSet, KeyToken, ScanItem};
use crate::store::Profile;

/// Shown while nothing has been typed yet. Distinct from an empty string:
/// deleting here is a no-op and the first real token replaces it.
pub const EMPTY_PLACEHOLDER: &str = "Noch kein Text…";

#[derive(Debug, Clone, PartialEq, Eq)]
enum TextToken {
    Glyph(String),
    Space,
}

/// Token-based text buffer. Delete removes whole tokens, so a committed
/// digraph like "SCH" disappears in one step, the same way it was entered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    tokens: Vec<TextToken>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push_glyph(&mut self, glyph: &str) {
        self.tokens.push(TextToken::Glyph(glyph.to_string()));
    }

    pub fn push_space(&mut self) {
        self.tokens.push(TextToken::Space);
    }

    /// No-op on the empty buffer.
    pub fn delete_last(&mut self) {
        self.tokens.pop();
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Rendered text, or the placeholder while empty.
    pub fn display(&self) -> String {
        if self.tokens.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }
        self.tokens
            .iter()
            .map(|token| match token {
                TextToken::Glyph(glyph) => glyph.as_str(),
                TextToken::Space => " ",
            })
            .collect()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum KeyboardLevel {
    Rows,
    Keys(usize),
}

/// Keyboard controller plugged into the scanning engine.
pub struct KeyboardFlow {
    level: KeyboardLevel,
    rows: ItemSet,
    buffer: TextBuffer,
    profile: Profile,
    profile_path: PathBuf,
    intro_pending: bool,
    row_dwell: Duration,
    key_dwell: Duration,
    row_hold: Duration,
    token_hold: Duration,
}

impl KeyboardFlow {
    pub fn new(
        profile: Profile,
        profile_path: PathBuf,
        row_dwell: Duration,
        key_dwell: Duration,
        row_hold: Duration,
        token_hold: Duration,
    ) -> Self {
        let intro_pending = !profile.keyboard_intro_heard;
        Self {
            level: KeyboardLevel::Rows,
            rows: layout::row_set(),
            buffer: TextBuffer::new(),
            profile,
            profile_path,
            intro_pending,
            row_dwell,
            key_dwell,
            row_hold,
            token_hold,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.display()
    }

    fn return_to_rows(&mut self) {
        self.level = KeyboardLevel::Rows;
    }

    fn token_announce(&self, label: &str) -> FlowCommand {
        FlowCommand::Announce {
            text: format!("{label} gewählt."),
            hold: self.token_hold,
            record: None,
        }
    }
}

impl DialogFlow for KeyboardFlow {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn items(&self) -> ItemSet {
        match self.level {
            KeyboardLevel::Rows => self.rows.clone(),
            KeyboardLevel::Keys(row) => layout::key_set(row).unwrap_or_else(|| {
                // Unreachable through commits; recover by scanning rows.
                log_debug(&format!("missing key set for row {row}"));
                self.rows.clone()
            }),
        }
    }

    fn dwell(&self) -> Duration {
        match self.level {
            KeyboardLevel::Rows => self.row_dwell,
            KeyboardLevel::Keys(_) => self.key_dwell,
        }
    }

    fn entry_prompt(&mut self) -> Option<String> {
        if self.intro_pending && self.level == KeyboardLevel::Rows {
            return Some(layout::INTRO.to_string());
        }
        None
    }

    fn on_prompt_settled(&mut self) {
        if !self.intro_pending {
            return;
        }
        self.intro_pending = false;
        self.profile.keyboard_intro_heard = true;
        if let Err(err) = self.profile.save(&self.profile_path) {
            log_debug(&format!("failed to persist intro flag: {err:#}"));
        }
    }

    fn on_commit(&mut self, item: &ScanItem) -> FlowCommand {
        match self.level {
            KeyboardLevel::Rows => match item.kind {
                ItemKind::Row(row) => {
                    self.level = KeyboardLevel::Keys(row);
                    FlowCommand::Announce {
                        text: layout::ROW_SELECTED.to_string(),
                        hold: self.row_hold,
                        record: None,
                    }
                }
                _ => {
                    log_debug(&format!("unexpected item '{}' at row level", item.id));
                    FlowCommand::Rescan
                }
            },
            KeyboardLevel::Keys(_) => match &item.kind {
                ItemKind::Key(KeyToken::Glyph(glyph)) => {
                    self.buffer.push_glyph(glyph);
                    self.return_to_rows();
                    self.token_announce(&item.label)
                }
                ItemKind::Key(KeyToken::Space) => {
                    self.buffer.push_space();
                    self.return_to_rows();
                    self.token_announce(&item.label)
                }
                ItemKind::Key(KeyToken::Delete) => {
                    self.buffer.delete_last();
                    self.return_to_rows();
                    self.token_announce(&item.label)
                }
                ItemKind::Back => FlowCommand::Exit,
                _ => {
                    log_debug(&format!("unexpected item '{}' at key level", item.id));
                    FlowCommand::Rescan
                }
            },
        }
    }

    fn reset_to_top(&mut self) {
        // The buffer deliberately survives; only the scan position resets.
        self.return_to_rows();
    }

    fn inactivity_notice(&self) -> String {
        layout::INACTIVITY_NOTICE.to_string()
    }

    fn display_text(&self) -> Option<String> {
        Some(self.buffer.display())
    }
}
