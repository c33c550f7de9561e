//! The scanning engine: one logical thread of control that owns the scan
//! session, the selection gate, and the inactivity watchdog.
//!
//! All waiting is expressed as `Option<Instant>` deadlines plus a poll-style
//! speech ticket, checked in [`Engine::tick`]. Stopping clears state
//! synchronously, so no timer from a dead session can fire into a new one,
//! and a commit is always fully applied before the next session arms.

use anyhow::Result;
use crossbeam_channel::Sender;
use std::time::{Duration, Instant};

use crate::log_debug;
use crate::scan::{ItemSet, ScanItem, ScanPhase, ScanSession};
use crate::speech::{SpeechGate, SpeechTicket};
use crate::store::{SelectionRecord, SelectionSink};
use crate::switch::Activation;

/// Engine-level timing knobs; dwell and hold times come from the flow.
#[derive(Debug, Copy, Clone)]
pub struct Timing {
    /// Pause between a settled list prompt and the first item announcement.
    pub lead_in: Duration,
    /// Watchdog bound. Reset by accepted commits, never by scan ticks.
    pub inactivity: Duration,
}

/// What the flow wants after a committed item.
#[derive(Debug)]
pub enum FlowCommand {
    /// Re-arm scanning against the flow's current item set.
    Rescan,
    /// Narrate `text`, hold for `hold`, then re-arm scanning.
    Announce {
        text: String,
        hold: Duration,
        record: Option<SelectionRecord>,
    },
    /// Leave the dialog; the engine goes idle.
    Exit,
}

/// A dialog variant the engine can drive: it owns the current item set and
/// interprets commits, nothing else.
pub trait DialogFlow {
    fn name(&self) -> &'static str;
    fn items(&self) -> ItemSet;
    fn dwell(&self) -> Duration;
    /// One-shot prompt narrated when the current set is (re)entered.
    fn entry_prompt(&mut self) -> Option<String>;
    /// Called once the entry prompt's narration settled.
    fn on_prompt_settled(&mut self) {}
    fn on_commit(&mut self, item: &ScanItem) -> FlowCommand;
    /// Forced return to the top-level item set (watchdog path).
    fn reset_to_top(&mut self);
    fn inactivity_notice(&self) -> String;
    /// Current text for display, if the flow carries any.
    fn display_text(&self) -> Option<String> {
        None
    }
}

/// Observable engine output, consumed by the terminal front end and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Prompt { text: String },
    Highlight { index: usize, label: String },
    Commit { label: String },
    Confirmation { text: String },
    InactivityNotice { text: String },
    TextChanged { text: String },
    Exited,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    /// List prompt narration in flight.
    Prompting,
    /// Prompt settled; waiting out the lead-in before the first item.
    LeadIn,
    /// A scan session is live; the selection gate is open.
    Scanning,
    /// Confirmation or token announcement narration in flight.
    Confirming,
    /// Narration settled; holding before scanning resumes.
    Holding,
    /// Inactivity notice narration in flight.
    Noticing,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    Exited,
}

pub struct Engine<F: DialogFlow> {
    flow: F,
    speech: SpeechGate,
    timing: Timing,
    sink: Box<dyn SelectionSink>,
    events: Option<Sender<EngineEvent>>,
    phase: EnginePhase,
    scan: Option<ScanSession>,
    ticket: Option<SpeechTicket>,
    phase_deadline: Option<Instant>,
    hold: Duration,
    watchdog_deadline: Option<Instant>,
}

impl<F: DialogFlow> Engine<F> {
    pub fn new(flow: F, speech: SpeechGate, timing: Timing, sink: Box<dyn SelectionSink>) -> Self {
        Self {
            flow,
            speech,
            timing,
            sink,
            events: None,
            phase: EnginePhase::Idle,
            scan: None,
            ticket: None,
            phase_deadline: None,
            hold: Duration::ZERO,
            watchdog_deadline: None,
        }
    }

    pub fn with_events(mut self, events: Sender<EngineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn scan_index(&self) -> Option<usize> {
        self.scan.as_ref().map(ScanSession::index)
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    /// Arm the watchdog and enter the flow's current item set.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        self.watchdog_deadline = Some(now + self.timing.inactivity);
        self.enter_current_set(now)
    }

    /// Synchronous teardown of everything that could fire later.
    pub fn stop(&mut self) {
        if let Some(scan) = self.scan.as_mut() {
            scan.stop();
        }
        self.scan = None;
        self.speech.cancel();
        self.ticket = None;
        self.phase_deadline = None;
        self.watchdog_deadline = None;
        self.phase = EnginePhase::Idle;
    }

    /// Stop whatever is running, then prompt or scan the current set.
    /// Starting over a live session always tears it down first.
    fn enter_current_set(&mut self, now: Instant) -> Result<()> {
        if let Some(scan) = self.scan.as_mut() {
            scan.stop();
        }
        self.scan = None;
        self.speech.cancel();
        self.ticket = None;
        self.phase_deadline = None;

        match self.flow.entry_prompt() {
            Some(prompt) => {
                self.emit(EngineEvent::Prompt {
                    text: prompt.clone(),
                });
                self.ticket = Some(self.speech.speak(&prompt, now));
                self.phase = EnginePhase::Prompting;
                Ok(())
            }
            None => self.begin_scanning(now),
        }
    }

    fn begin_scanning(&mut self, now: Instant) -> Result<()> {
        let session = ScanSession::start(self.flow.items(), self.flow.dwell())?;
        let first = session.current().clone();
        self.emit(EngineEvent::Highlight {
            index: 0,
            label: first.label.clone(),
        });
        self.ticket = Some(self.speech.speak(&first.narration, now));
        self.scan = Some(session);
        self.phase = EnginePhase::Scanning;
        Ok(())
    }

    fn ticket_settled(&mut self, now: Instant) -> bool {
        match self.ticket.as_mut() {
            Some(ticket) => {
                if ticket.settled(now) {
                    self.ticket = None;
                    true
                } else {
                    false
                }
            }
            // No narration in flight counts as settled.
            None => true,
        }
    }

    fn fire_watchdog(&mut self, now: Instant) {
        tracing::info!(flow = self.flow.name(), "inactivity watchdog fired");
        if let Some(scan) = self.scan.as_mut() {
            scan.stop();
        }
        self.scan = None;
        self.speech.cancel();
        self.phase_deadline = None;
        self.watchdog_deadline = None;

        let notice = self.flow.inactivity_notice();
        self.emit(EngineEvent::InactivityNotice {
            text: notice.clone(),
        });
        self.ticket = Some(self.speech.speak(&notice, now));
        self.phase = EnginePhase::Noticing;
    }

    /// Advance timers and narration. Call this every loop iteration.
    pub fn tick(&mut self, now: Instant) -> Result<EngineStatus> {
        if self.phase == EnginePhase::Idle {
            return Ok(EngineStatus::Exited);
        }

        // The watchdog measures user silence while the selection gate is
        // open. It deliberately ignores scan progress.
        if self.phase == EnginePhase::Scanning {
            if let Some(deadline) = self.watchdog_deadline {
                if now >= deadline {
                    self.fire_watchdog(now);
                    return Ok(EngineStatus::Running);
                }
            }
        }

        match self.phase {
            EnginePhase::Prompting => {
                if self.ticket_settled(now) {
                    self.flow.on_prompt_settled();
                    self.phase = EnginePhase::LeadIn;
                    self.phase_deadline = Some(now + self.timing.lead_in);
                }
            }
            EnginePhase::LeadIn => {
                if self.phase_deadline.map(|d| now >= d).unwrap_or(true) {
                    self.phase_deadline = None;
                    self.begin_scanning(now)?;
                }
            }
            EnginePhase::Scanning => {
                let settled = self.ticket_settled(now);
                let mut advanced = None;
                if let Some(scan) = self.scan.as_mut() {
                    if settled && scan.phase() == ScanPhase::Announcing {
                        scan.narration_settled(now);
                    }
                    if scan.dwell_elapsed(now) {
                        let next = scan.advance().clone();
                        advanced = Some((scan.index(), next));
                    }
                }
                if let Some((index, next)) = advanced {
                    self.emit(EngineEvent::Highlight {
                        index,
                        label: next.label.clone(),
                    });
                    self.ticket = Some(self.speech.speak(&next.narration, now));
                }
            }
            EnginePhase::Confirming => {
                if self.ticket_settled(now) {
                    self.phase = EnginePhase::Holding;
                    self.phase_deadline = Some(now + self.hold);
                }
            }
            EnginePhase::Holding => {
                if self.phase_deadline.map(|d| now >= d).unwrap_or(true) {
                    self.phase_deadline = None;
                    self.enter_current_set(now)?;
                }
            }
            EnginePhase::Noticing => {
                if self.ticket_settled(now) {
                    self.flow.reset_to_top();
                    self.watchdog_deadline = Some(now + self.timing.inactivity);
                    self.enter_current_set(now)?;
                }
            }
            EnginePhase::Idle => {}
        }

        Ok(EngineStatus::Running)
    }

    /// Selection gate: a debounced activation commits the highlighted item,
    /// but only while a session is actively scanning. Anything arriving in a
    /// transition gap is dropped, never queued.
    pub fn on_activation(&mut self, activation: Activation, now: Instant) -> Result<EngineStatus> {
        if self.phase != EnginePhase::Scanning {
            log_debug(&format!(
                "{} activation ignored outside scanning",
                activation.origin.label()
            ));
            return Ok(match self.phase {
                EnginePhase::Idle => EngineStatus::Exited,
                _ => EngineStatus::Running,
            });
        }
        let Some(scan) = self.scan.as_mut() else {
            return Ok(EngineStatus::Running);
        };

        let item = scan.current().clone();
        scan.stop();
        self.scan = None;
        self.speech.cancel();
        self.ticket = None;
        self.phase_deadline = None;

        tracing::info!(
            flow = self.flow.name(),
            item = %item.id,
            origin = activation.origin.label(),
            "selection committed"
        );
        self.emit(EngineEvent::Commit {
            label: item.label.clone(),
        });
        self.watchdog_deadline = Some(now + self.timing.inactivity);

        let before = self.flow.display_text();
        let command = self.flow.on_commit(&item);
        let after = self.flow.display_text();
        if let Some(text) = after {
            if before.as_deref() != Some(text.as_str()) {
                self.emit(EngineEvent::TextChanged { text });
            }
        }

        match command {
            FlowCommand::Rescan => {
                self.enter_current_set(now)?;
                Ok(EngineStatus::Running)
            }
            FlowCommand::Announce { text, hold, record } => {
                if let Some(record) = record {
                    // Persistence is best-effort; a failing sink must not
                    // interrupt the interaction.
                    if let Err(err) = self.sink.record(&record) {
                        log_debug(&format!("failed to record selection: {err:#}"));
                    }
                }
                self.emit(EngineEvent::Confirmation { text: text.clone() });
                self.ticket = Some(self.speech.speak(&text, now));
                self.hold = hold;
                self.phase = EnginePhase::Confirming;
                Ok(EngineStatus::Running)
            }
            FlowCommand::Exit => {
                tracing::info!(flow = self.flow.name(), "dialog exited");
                self.stop();
                self.emit(EngineEvent::Exited);
                Ok(EngineStatus::Exited)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ItemKind, ScanItem};
    use crate::store::NullSink;
    use crate::switch::{SwitchOrigin, SwitchSource};
    use crossbeam_channel::{unbounded, Receiver};

    const PER_CHAR: Duration = Duration::from_millis(10);
    const TICK: Duration = Duration::from_millis(25);

    struct ListFlow {
        items: ItemSet,
        prompt: Option<String>,
        committed: Vec<String>,
        command: fn(&ScanItem) -> FlowCommand,
    }

    impl ListFlow {
        fn new(command: fn(&ScanItem) -> FlowCommand) -> Self {
            Self {
                items: ItemSet::new(
                    "fruit",
                    vec![
                        ScanItem::plain("apple", "Apple", ItemKind::Topic),
                        ScanItem::plain("banana", "Banana", ItemKind::Topic),
                        ScanItem::back("Back"),
                    ],
                ),
                prompt: None,
                committed: Vec::new(),
                command,
            }
        }
    }

    impl DialogFlow for ListFlow {
        fn name(&self) -> &'static str {
            "fruit"
        }

        fn items(&self) -> ItemSet {
            self.items.clone()
        }

        fn dwell(&self) -> Duration {
            Duration::from_millis(3000)
        }

        fn entry_prompt(&mut self) -> Option<String> {
            self.prompt.take()
        }

        fn on_commit(&mut self, item: &ScanItem) -> FlowCommand {
            self.committed.push(item.id.clone());
            (self.command)(item)
        }

        fn reset_to_top(&mut self) {}

        fn inactivity_notice(&self) -> String {
            "Keine Eingabe erkannt.".to_string()
        }
    }

    fn rescan_command(_item: &ScanItem) -> FlowCommand {
        FlowCommand::Rescan
    }

    fn exit_command(_item: &ScanItem) -> FlowCommand {
        FlowCommand::Exit
    }

    fn engine_with(
        flow: ListFlow,
        inactivity: Duration,
    ) -> (Engine<ListFlow>, Receiver<EngineEvent>) {
        let (tx, rx) = unbounded();
        let engine = Engine::new(
            flow,
            SpeechGate::muted(PER_CHAR),
            Timing {
                lead_in: Duration::from_millis(3000),
                inactivity,
            },
            Box::new(NullSink),
        )
        .with_events(tx);
        (engine, rx)
    }

    fn pump<F: DialogFlow>(engine: &mut Engine<F>, now: &mut Instant, duration: Duration) {
        let mut remaining = duration;
        loop {
            engine.tick(*now).expect("tick");
            if remaining < TICK {
                break;
            }
            remaining -= TICK;
            *now += TICK;
        }
    }

    fn drain(rx: &Receiver<EngineEvent>) -> Vec<EngineEvent> {
        rx.try_iter().collect()
    }

    fn activation(at: Instant) -> Activation {
        Activation {
            origin: SwitchOrigin::Manual,
            at,
        }
    }

    #[test]
    fn dwell_waits_for_narration_to_settle() {
        let (mut engine, _rx) = engine_with(ListFlow::new(rescan_command), Duration::from_secs(60));
        let mut now = Instant::now();
        engine.start(now).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Scanning);
        assert_eq!(engine.scan_index(), Some(0));

        // "Apple" takes 400ms floor + 5 * 10ms to "narrate". Even well past
        // the dwell length, the index holds while narration is unsettled.
        pump(&mut engine, &mut now, Duration::from_millis(400));
        assert_eq!(engine.scan_index(), Some(0));

        // After settlement plus one dwell, the scan advances.
        pump(&mut engine, &mut now, Duration::from_millis(3200));
        assert_eq!(engine.scan_index(), Some(1));
    }

    #[test]
    fn activation_commits_the_highlighted_item() {
        let (mut engine, rx) = engine_with(ListFlow::new(rescan_command), Duration::from_secs(60));
        let mut now = Instant::now();
        engine.start(now).unwrap();

        // Reach index 1 (Banana), then commit during its dwell.
        pump(&mut engine, &mut now, Duration::from_millis(3600));
        assert_eq!(engine.scan_index(), Some(1));
        engine.on_activation(activation(now), now).unwrap();

        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Commit {
            label: "Banana".to_string()
        }));
        assert_eq!(engine.flow().committed, vec!["banana".to_string()]);
        // Rescan restarted the session at the top of the list.
        assert_eq!(engine.scan_index(), Some(0));
    }

    #[test]
    fn activation_outside_scanning_is_dropped() {
        let mut flow = ListFlow::new(rescan_command);
        flow.prompt = Some("Prompt".to_string());
        let (mut engine, _rx) = engine_with(flow, Duration::from_secs(60));
        let now = Instant::now();
        engine.start(now).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Prompting);

        engine.on_activation(activation(now), now).unwrap();
        assert!(engine.flow().committed.is_empty());
    }

    #[test]
    fn prompt_then_lead_in_then_first_item() {
        let mut flow = ListFlow::new(rescan_command);
        flow.prompt = Some("Was?".to_string());
        let (mut engine, rx) = engine_with(flow, Duration::from_secs(60));
        let mut now = Instant::now();
        engine.start(now).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Prompting);

        // Prompt narration settles, lead-in runs, scanning begins at 0.
        pump(&mut engine, &mut now, Duration::from_millis(4000));
        assert_eq!(engine.phase(), EnginePhase::Scanning);
        let events = drain(&rx);
        assert_eq!(
            events.first(),
            Some(&EngineEvent::Prompt {
                text: "Was?".to_string()
            })
        );
        assert!(events.contains(&EngineEvent::Highlight {
            index: 0,
            label: "Apple".to_string()
        }));
    }

    #[test]
    fn exit_command_goes_idle_and_stays_there() {
        let (mut engine, rx) = engine_with(ListFlow::new(exit_command), Duration::from_secs(60));
        let mut now = Instant::now();
        engine.start(now).unwrap();
        pump(&mut engine, &mut now, Duration::from_millis(500));

        let status = engine.on_activation(activation(now), now).unwrap();
        assert_eq!(status, EngineStatus::Exited);
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(drain(&rx).contains(&EngineEvent::Exited));
        assert_eq!(engine.tick(now).unwrap(), EngineStatus::Exited);
    }

    #[test]
    fn watchdog_is_not_reset_by_scan_progress() {
        let (mut engine, rx) =
            engine_with(ListFlow::new(rescan_command), Duration::from_millis(12_000));
        let mut now = Instant::now();
        engine.start(now).unwrap();

        // Several items get highlighted, but silence accumulates and the
        // watchdog still fires at its original deadline.
        pump(&mut engine, &mut now, Duration::from_millis(12_100));
        let events = drain(&rx);
        let highlights = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Highlight { .. }))
            .count();
        assert!(highlights >= 2, "scanning advanced before the watchdog");
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::InactivityNotice { .. })));

        // After the notice settles, scanning resumes from the top.
        pump(&mut engine, &mut now, Duration::from_millis(1000));
        assert_eq!(engine.phase(), EnginePhase::Scanning);
        assert_eq!(engine.scan_index(), Some(0));
    }

    #[test]
    fn commit_resets_the_watchdog() {
        let (mut engine, rx) =
            engine_with(ListFlow::new(rescan_command), Duration::from_millis(12_000));
        let mut now = Instant::now();
        engine.start(now).unwrap();

        // A commit shortly before the bound pushes the deadline out.
        pump(&mut engine, &mut now, Duration::from_millis(10_000));
        engine.on_activation(activation(now), now).unwrap();
        drain(&rx);

        pump(&mut engine, &mut now, Duration::from_millis(4_000));
        let events = drain(&rx);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, EngineEvent::InactivityNotice { .. })),
            "watchdog must restart from the commit"
        );
    }

    #[test]
    fn announce_holds_then_rescans() {
        fn announce(_item: &ScanItem) -> FlowCommand {
            FlowCommand::Announce {
                text: "Fertig.".to_string(),
                hold: Duration::from_millis(5000),
                record: None,
            }
        }
        let (mut engine, rx) = engine_with(ListFlow::new(announce), Duration::from_secs(60));
        let mut now = Instant::now();
        engine.start(now).unwrap();
        pump(&mut engine, &mut now, Duration::from_millis(500));

        engine.on_activation(activation(now), now).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Confirming);
        assert!(drain(&rx).contains(&EngineEvent::Confirmation {
            text: "Fertig.".to_string()
        }));

        // Narration settles, hold runs out, scanning resumes.
        pump(&mut engine, &mut now, Duration::from_millis(6000));
        assert_eq!(engine.phase(), EnginePhase::Scanning);
        assert_eq!(engine.scan_index(), Some(0));
    }

    #[test]
    fn stop_is_synchronous_and_final() {
        let (mut engine, _rx) = engine_with(ListFlow::new(rescan_command), Duration::from_secs(60));
        let mut now = Instant::now();
        engine.start(now).unwrap();
        pump(&mut engine, &mut now, Duration::from_millis(700));

        engine.stop();
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.scan_index().is_none());
        // A very late tick cannot resurrect anything.
        now += Duration::from_secs(120);
        assert_eq!(engine.tick(now).unwrap(), EngineStatus::Exited);
    }

    #[test]
    fn debounced_burst_commits_once() {
        let (mut engine, _rx) = engine_with(ListFlow::new(rescan_command), Duration::from_secs(60));
        let (mut source, port) = SwitchSource::new(Duration::from_millis(300));
        let mut now = Instant::now();
        engine.start(now).unwrap();
        pump(&mut engine, &mut now, Duration::from_millis(500));

        for _ in 0..5 {
            port.fire(SwitchOrigin::Blink);
        }
        let mut commits = 0;
        while let Some(activation) = source.poll() {
            engine.on_activation(activation, now).unwrap();
            commits += 1;
        }
        assert_eq!(commits, 1);
        assert_eq!(engine.flow().committed.len(), 1);
    }
}
