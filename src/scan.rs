//! Ordered item sets and the per-session highlight/advance state machine.
//!
//! A [`ScanSession`] owns the cursor over one immutable [`ItemSet`]. It never
//! talks to the narrator or the switch itself; the engine drives it through
//! explicit phase changes so that every suspension point stays visible.

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A single key on the scanning keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyToken {
    /// Letter, digraph, or short word appended verbatim to the text buffer.
    Glyph(String),
    Space,
    Delete,
}

/// Distinguishes what committing an item means to the active flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Topic,
    SubTopic,
    Intensity(u8),
    Row(usize),
    Key(KeyToken),
    /// Terminal navigation entry, conventionally last in every list.
    Back,
}

/// One scannable entry. Narration text is resolved at construction time and
/// may differ from the label (phonetic key names, "3, leicht" for levels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanItem {
    pub id: String,
    pub label: String,
    pub narration: String,
    pub kind: ItemKind,
}

impl ScanItem {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        narration: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            narration: narration.into(),
            kind,
        }
    }

    /// Plain entry whose narration equals its label.
    pub fn plain(id: &str, label: &str, kind: ItemKind) -> Self {
        Self::new(id, label, label, kind)
    }

    pub fn back(label: &str) -> Self {
        Self::new("zurueck", label, label, ItemKind::Back)
    }

    pub fn is_back(&self) -> bool {
        matches!(self.kind, ItemKind::Back)
    }
}

/// Immutable, ordered list of scannable items. Cheap to clone; sessions hold
/// it by reference so the order is stable for the whole pass.
#[derive(Debug, Clone)]
pub struct ItemSet {
    name: &'static str,
    items: Arc<Vec<ScanItem>>,
}

impl ItemSet {
    pub fn new(name: &'static str, items: Vec<ScanItem>) -> Self {
        Self {
            name,
            items: Arc::new(items),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScanItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanItem> {
        self.items.iter()
    }
}

/// Where the session currently sits within one highlight cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    /// Narration for the current item is in flight; the dwell timer is NOT
    /// armed yet. Narration settles first, then the dwell begins.
    Announcing,
    /// Narration settled; the dwell deadline is armed.
    Dwelling,
}

/// One active scan over an item set. At most one dwell deadline is ever armed;
/// [`ScanSession::stop`] clears it synchronously so a stopped session can
/// never fire into torn-down state.
#[derive(Debug)]
pub struct ScanSession {
    items: ItemSet,
    dwell: Duration,
    index: usize,
    phase: ScanPhase,
    dwell_deadline: Option<Instant>,
    running: bool,
}

impl ScanSession {
    /// Start a session at index 0. Refuses an empty item set: wraparound
    /// arithmetic over zero items is a configuration error, not a scan.
    pub fn start(items: ItemSet, dwell: Duration) -> Result<Self> {
        if items.is_empty() {
            bail!("refusing to scan empty item set '{}'", items.name());
        }
        Ok(Self {
            items,
            dwell,
            index: 0,
            phase: ScanPhase::Announcing,
            dwell_deadline: None,
            running: true,
        })
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current(&self) -> &ScanItem {
        self.items.get(self.index).expect("index within item set")
    }

    /// Called once the current item's narration has settled; arms the dwell.
    pub fn narration_settled(&mut self, now: Instant) {
        if !self.running || self.phase != ScanPhase::Announcing {
            return;
        }
        self.phase = ScanPhase::Dwelling;
        self.dwell_deadline = Some(now + self.dwell);
    }

    pub fn dwell_elapsed(&self, now: Instant) -> bool {
        match (self.running, self.phase, self.dwell_deadline) {
            (true, ScanPhase::Dwelling, Some(deadline)) => now >= deadline,
            _ => false,
        }
    }

    /// Advance to the next item with wraparound and re-enter `Announcing`.
    pub fn advance(&mut self) -> &ScanItem {
        self.index = (self.index + 1) % self.items.len();
        self.phase = ScanPhase::Announcing;
        self.dwell_deadline = None;
        self.current()
    }

    /// Synchronous teardown: no deadline survives this call.
    pub fn stop(&mut self) {
        self.running = false;
        self.dwell_deadline = None;
    }

    #[cfg(test)]
    pub(crate) fn has_armed_deadline(&self) -> bool {
        self.dwell_deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_set() -> ItemSet {
        ItemSet::new(
            "fruit",
            vec![
                ScanItem::plain("apple", "Apple", ItemKind::Topic),
                ScanItem::plain("banana", "Banana", ItemKind::Topic),
                ScanItem::back("Back"),
            ],
        )
    }

    #[test]
    fn refuses_empty_item_set() {
        let empty = ItemSet::new("empty", Vec::new());
        let err = ScanSession::start(empty, Duration::from_millis(100)).unwrap_err();
        assert!(err.to_string().contains("empty item set"));
    }

    #[test]
    fn advancing_n_times_wraps_back_to_start() {
        let mut session = ScanSession::start(fruit_set(), Duration::from_millis(100)).unwrap();
        let n = session.items().len();
        let start = session.index();
        let mut seen = Vec::new();
        for _ in 0..n {
            seen.push(session.index());
            session.advance();
        }
        assert_eq!(session.index(), start);
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2], "no skips, no repeats");
    }

    #[test]
    fn dwell_arms_only_after_narration_settles() {
        let now = Instant::now();
        let mut session = ScanSession::start(fruit_set(), Duration::from_millis(100)).unwrap();
        assert_eq!(session.phase(), ScanPhase::Announcing);
        assert!(!session.dwell_elapsed(now + Duration::from_secs(10)));

        session.narration_settled(now);
        assert_eq!(session.phase(), ScanPhase::Dwelling);
        assert!(!session.dwell_elapsed(now + Duration::from_millis(99)));
        assert!(session.dwell_elapsed(now + Duration::from_millis(100)));
    }

    #[test]
    fn stop_clears_any_pending_deadline() {
        let now = Instant::now();
        let mut session = ScanSession::start(fruit_set(), Duration::from_millis(100)).unwrap();
        session.narration_settled(now);
        assert!(session.has_armed_deadline());

        session.stop();
        assert!(!session.is_running());
        assert!(!session.has_armed_deadline());
        assert!(!session.dwell_elapsed(now + Duration::from_secs(60)));
    }

    #[test]
    fn settled_notice_ignored_once_stopped() {
        let now = Instant::now();
        let mut session = ScanSession::start(fruit_set(), Duration::from_millis(100)).unwrap();
        session.stop();
        session.narration_settled(now);
        assert!(!session.has_armed_deadline());
    }

    #[test]
    fn advance_resets_phase_and_deadline() {
        let now = Instant::now();
        let mut session = ScanSession::start(fruit_set(), Duration::from_millis(100)).unwrap();
        session.narration_settled(now);
        let item = session.advance();
        assert_eq!(item.id, "banana");
        assert_eq!(session.phase(), ScanPhase::Announcing);
        assert!(!session.has_armed_deadline());
    }
}
