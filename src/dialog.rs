//! Hierarchical assessment dialogs: topic, sub-topic, optional intensity,
//! confirmation.
//!
//! Both shipped dialogs (pain, needs) run through one [`AssessmentFlow`]
//! parameterized by a [`DialogConfig`]. The flow owns which item set is
//! currently scanned; every level change swaps the set and queues the list
//! prompt, so the scan session is always rebuilt against fresh data, never
//! mutated in place.

use std::time::Duration;

use crate::catalog::{needs, pain};
use crate::engine::{DialogFlow, FlowCommand};
use crate::grammar;
use crate::log_debug;
use crate::scan::{ItemKind, ItemSet, ScanItem};
use crate::store::SelectionRecord;

/// Which list the dialog is currently scanning.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DialogLevel {
    Top,
    Sub,
    Intensity,
}

/// Extra stage between sub-topic and confirmation (the 1-10 pain scale).
pub struct IntensityStage {
    pub items: ItemSet,
    pub prompt: &'static str,
}

/// Data and phrasing for one dialog variant.
pub struct DialogConfig {
    pub name: &'static str,
    pub top_prompt: &'static str,
    pub topics: ItemSet,
    pub sub_items: fn(&str) -> Option<ItemSet>,
    pub sub_prompt: fn(&ScanItem) -> String,
    pub intensity: Option<IntensityStage>,
    pub confirmation: fn(&ScanItem, &ScanItem, Option<&ScanItem>) -> String,
    /// Spoken when a confirmation sentence cannot be assembled.
    pub confirmation_fallback: &'static str,
    pub inactivity_notice: &'static str,
}

fn pain_sub_prompt(topic: &ScanItem) -> String {
    grammar::pain_sub_prompt(&topic.id, &topic.label)
}

fn pain_confirmation(_main: &ScanItem, sub: &ScanItem, intensity: Option<&ScanItem>) -> String {
    match intensity {
        Some(level) => grammar::pain_confirmation(&sub.id, &sub.label, &level.narration),
        None => grammar::PAIN_CONFIRMATION_FALLBACK.to_string(),
    }
}

fn needs_sub_prompt(topic: &ScanItem) -> String {
    grammar::needs_sub_prompt(&topic.id).to_string()
}

fn needs_confirmation(main: &ScanItem, sub: &ScanItem, _intensity: Option<&ScanItem>) -> String {
    grammar::needs_confirmation(&main.id, &sub.narration)
}

pub fn pain_dialog() -> DialogConfig {
    DialogConfig {
        name: "pain",
        top_prompt: pain::TOP_PROMPT,
        topics: pain::main_regions(),
        sub_items: pain::sub_regions,
        sub_prompt: pain_sub_prompt,
        intensity: Some(IntensityStage {
            items: pain::intensity_scale(),
            prompt: pain::INTENSITY_PROMPT,
        }),
        confirmation: pain_confirmation,
        confirmation_fallback: grammar::PAIN_CONFIRMATION_FALLBACK,
        inactivity_notice: "Keine Eingabe erkannt. Zurück zur Hauptauswahl.",
    }
}

pub fn needs_dialog() -> DialogConfig {
    DialogConfig {
        name: "needs",
        top_prompt: needs::TOP_PROMPT,
        topics: needs::topics(),
        sub_items: needs::sub_items,
        sub_prompt: needs_sub_prompt,
        intensity: None,
        confirmation: needs_confirmation,
        confirmation_fallback: grammar::NEEDS_CONFIRMATION_FALLBACK,
        inactivity_notice: "Keine Eingabe erkannt. Zurück zur Hauptauswahl.",
    }
}

/// Dialog state machine driven by the scanning engine.
pub struct AssessmentFlow {
    config: DialogConfig,
    level: DialogLevel,
    current: ItemSet,
    main: Option<ScanItem>,
    sub: Option<ScanItem>,
    pending_prompt: Option<String>,
    item_dwell: Duration,
    confirm_hold: Duration,
}

impl AssessmentFlow {
    pub fn new(config: DialogConfig, item_dwell: Duration, confirm_hold: Duration) -> Self {
        let current = config.topics.clone();
        let pending_prompt = Some(config.top_prompt.to_string());
        Self {
            config,
            level: DialogLevel::Top,
            current,
            main: None,
            sub: None,
            pending_prompt,
            item_dwell,
            confirm_hold,
        }
    }

    pub fn level(&self) -> DialogLevel {
        self.level
    }

    fn enter_top(&mut self) {
        self.level = DialogLevel::Top;
        self.current = self.config.topics.clone();
        self.main = None;
        self.sub = None;
        self.pending_prompt = Some(self.config.top_prompt.to_string());
    }

    fn enter_sub(&mut self, topic: &ScanItem) -> FlowCommand {
        let Some(items) = (self.config.sub_items)(&topic.id) else {
            // A topic without a sub list is a catalog defect; keep scanning
            // the current list instead of tearing the dialog down.
            log_debug(&format!("no sub items for topic '{}'", topic.id));
            return FlowCommand::Rescan;
        };
        self.main = Some(topic.clone());
        self.level = DialogLevel::Sub;
        self.pending_prompt = Some((self.config.sub_prompt)(topic));
        self.current = items;
        FlowCommand::Rescan
    }

    fn confirm(&mut self, intensity: Option<&ScanItem>) -> FlowCommand {
        let (text, record) = match (self.main.as_ref(), self.sub.as_ref()) {
            (Some(main), Some(sub)) => {
                let level = intensity.and_then(|item| match item.kind {
                    ItemKind::Intensity(level) => Some(level),
                    _ => None,
                });
                let text = (self.config.confirmation)(main, sub, intensity);
                let record =
                    SelectionRecord::now(self.config.name, &main.id, Some(sub.id.as_str()), level);
                (text, Some(record))
            }
            _ => (self.config.confirmation_fallback.to_string(), None),
        };
        // Selection state clears on the way into confirmation; the engine
        // returns to the freshly reset top list after the hold.
        self.enter_top();
        FlowCommand::Announce {
            text,
            hold: self.confirm_hold,
            record,
        }
    }
}

impl DialogFlow for AssessmentFlow {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn items(&self) -> ItemSet {
        self.current.clone()
    }

    fn dwell(&self) -> Duration {
        self.item_dwell
    }

    fn entry_prompt(&mut self) -> Option<String> {
        self.pending_prompt.take()
    }

    fn on_commit(&mut self, item: &ScanItem) -> FlowCommand {
        match self.level {
            DialogLevel::Top => {
                if item.is_back() {
                    // Back at the top leaves the dialog; there is nothing
                    // above it to return to.
                    return FlowCommand::Exit;
                }
                self.enter_sub(item)
            }
            DialogLevel::Sub => {
                if item.is_back() {
                    self.enter_top();
                    return FlowCommand::Rescan;
                }
                self.sub = Some(item.clone());
                match &self.config.intensity {
                    Some(stage) => {
                        self.level = DialogLevel::Intensity;
                        self.pending_prompt = Some(stage.prompt.to_string());
                        self.current = stage.items.clone();
                        FlowCommand::Rescan
                    }
                    None => self.confirm(None),
                }
            }
            DialogLevel::Intensity => match item.kind {
                ItemKind::Intensity(_) => self.confirm(Some(item)),
                _ => {
                    log_debug(&format!(
                        "unexpected item '{}' on the intensity scale",
                        item.id
                    ));
                    FlowCommand::Rescan
                }
            },
        }
    }

    fn reset_to_top(&mut self) {
        self.enter_top();
    }

    fn inactivity_notice(&self) -> String {
        self.config.inactivity_notice.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pain_flow() -> AssessmentFlow {
        AssessmentFlow::new(
            pain_dialog(),
            Duration::from_millis(3000),
            Duration::from_millis(5000),
        )
    }

    fn find(flow: &AssessmentFlow, id: &str) -> ScanItem {
        flow.items()
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .unwrap_or_else(|| panic!("item '{id}' not in current set"))
    }

    #[test]
    fn walks_topic_sub_intensity_to_confirmation() {
        let mut flow = pain_flow();
        assert_eq!(flow.entry_prompt().as_deref(), Some(pain::TOP_PROMPT));

        let kopf = find(&flow, "kopf");
        assert!(matches!(flow.on_commit(&kopf), FlowCommand::Rescan));
        assert_eq!(flow.level(), DialogLevel::Sub);
        assert_eq!(
            flow.entry_prompt().as_deref(),
            Some("Wählen Sie einen Bereich im Kopf aus.")
        );

        let stirn = find(&flow, "stirn");
        assert!(matches!(flow.on_commit(&stirn), FlowCommand::Rescan));
        assert_eq!(flow.level(), DialogLevel::Intensity);
        assert_eq!(flow.entry_prompt().as_deref(), Some(pain::INTENSITY_PROMPT));

        let drei = find(&flow, "level-3");
        match flow.on_commit(&drei) {
            FlowCommand::Announce { text, record, .. } => {
                assert_eq!(text, "Der Patient hat Stirnschmerzen Level 3, leicht.");
                let record = record.expect("completed selection is recorded");
                assert_eq!(record.dialog, "pain");
                assert_eq!(record.main_region, "kopf");
                assert_eq!(record.sub_region.as_deref(), Some("stirn"));
                assert_eq!(record.intensity, Some(3));
            }
            other => panic!("expected confirmation, got {other:?}"),
        }

        // Confirmation clears everything and queues the top prompt again.
        assert_eq!(flow.level(), DialogLevel::Top);
        assert_eq!(flow.entry_prompt().as_deref(), Some(pain::TOP_PROMPT));
    }

    #[test]
    fn back_at_sub_level_returns_to_top() {
        let mut flow = pain_flow();
        let kopf = find(&flow, "kopf");
        flow.on_commit(&kopf);
        flow.entry_prompt();

        let back = find(&flow, "zurueck");
        assert!(matches!(flow.on_commit(&back), FlowCommand::Rescan));
        assert_eq!(flow.level(), DialogLevel::Top);
        assert_eq!(flow.entry_prompt().as_deref(), Some(pain::TOP_PROMPT));
    }

    #[test]
    fn back_at_top_level_exits_the_dialog() {
        let mut flow = pain_flow();
        let back = find(&flow, "zurueck");
        assert!(matches!(flow.on_commit(&back), FlowCommand::Exit));
    }

    #[test]
    fn needs_dialog_confirms_without_intensity() {
        let mut flow = AssessmentFlow::new(
            needs_dialog(),
            Duration::from_millis(3000),
            Duration::from_millis(5000),
        );
        let hygiene = find(&flow, "hygiene");
        assert!(matches!(flow.on_commit(&hygiene), FlowCommand::Rescan));
        assert_eq!(
            flow.entry_prompt().as_deref(),
            Some("Was möchten Sie machen?")
        );

        let duschen = find(&flow, "duschen");
        match flow.on_commit(&duschen) {
            FlowCommand::Announce { text, record, .. } => {
                assert_eq!(text, "Ich möchte duschen.");
                let record = record.expect("recorded");
                assert_eq!(record.intensity, None);
                assert_eq!(record.sub_region.as_deref(), Some("duschen"));
            }
            other => panic!("expected confirmation, got {other:?}"),
        }
    }

    #[test]
    fn prompt_is_consumed_once_per_entry() {
        let mut flow = pain_flow();
        assert!(flow.entry_prompt().is_some());
        assert!(flow.entry_prompt().is_none(), "no prompt until re-entry");
    }
}
