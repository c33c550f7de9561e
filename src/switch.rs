//! The single binary input channel: blink and manual events merged, debounced.
//!
//! Producers (blink detector bridge, terminal input thread) hold cloneable
//! [`SwitchPort`]s and fire raw events; the engine side drains them through
//! [`SwitchSource::poll`], which owns the cooldown timestamp. Within one
//! cooldown window at most one activation is ever forwarded, no matter how
//! many raw events arrive.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::log_debug;

/// Where a raw activation came from. Downstream behaviour is identical; the
/// origin only matters for diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwitchOrigin {
    Blink,
    Manual,
}

impl SwitchOrigin {
    pub fn label(self) -> &'static str {
        match self {
            SwitchOrigin::Blink => "blink",
            SwitchOrigin::Manual => "manual",
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct RawActivation {
    origin: SwitchOrigin,
    at: Instant,
}

/// A debounced, accepted activation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Activation {
    pub origin: SwitchOrigin,
    pub at: Instant,
}

/// Producer handle. Cloneable; firing never blocks.
#[derive(Clone)]
pub struct SwitchPort {
    tx: Sender<RawActivation>,
}

impl SwitchPort {
    pub fn fire(&self, origin: SwitchOrigin) {
        let _ = self.tx.send(RawActivation {
            origin,
            at: Instant::now(),
        });
    }

    #[cfg(test)]
    pub(crate) fn fire_at(&self, origin: SwitchOrigin, at: Instant) {
        let _ = self.tx.send(RawActivation { origin, at });
    }
}

/// Consumer side. The cooldown timestamp lives here and nowhere else.
pub struct SwitchSource {
    rx: Receiver<RawActivation>,
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl SwitchSource {
    pub fn new(cooldown: Duration) -> (Self, SwitchPort) {
        let (tx, rx) = unbounded();
        (
            Self {
                rx,
                cooldown,
                last_accepted: None,
            },
            SwitchPort { tx },
        )
    }

    /// Drain pending raw events and return at most one accepted activation.
    /// Everything inside the cooldown window is dropped, not queued.
    pub fn poll(&mut self) -> Option<Activation> {
        let mut accepted = None;
        while let Ok(raw) = self.rx.try_recv() {
            if accepted.is_some() {
                log_debug(&format!(
                    "dropping {} activation behind an accepted one",
                    raw.origin.label()
                ));
                continue;
            }
            let in_cooldown = self
                .last_accepted
                .map(|last| raw.at.duration_since(last) < self.cooldown)
                .unwrap_or(false);
            if in_cooldown {
                log_debug(&format!(
                    "dropping {} activation inside cooldown",
                    raw.origin.label()
                ));
                continue;
            }
            self.last_accepted = Some(raw.at);
            accepted = Some(Activation {
                origin: raw.origin,
                at: raw.at,
            });
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_within_cooldown_forwards_exactly_one() {
        let (mut source, port) = SwitchSource::new(Duration::from_millis(300));
        let base = Instant::now();
        for i in 0..10 {
            port.fire_at(SwitchOrigin::Blink, base + Duration::from_millis(i * 20));
        }
        let first = source.poll();
        assert!(first.is_some());
        assert!(source.poll().is_none(), "burst must collapse to one");
    }

    #[test]
    fn activation_after_cooldown_is_accepted() {
        let (mut source, port) = SwitchSource::new(Duration::from_millis(300));
        let base = Instant::now();
        port.fire_at(SwitchOrigin::Manual, base);
        assert!(source.poll().is_some());

        port.fire_at(SwitchOrigin::Manual, base + Duration::from_millis(299));
        assert!(source.poll().is_none(), "still inside the window");

        port.fire_at(SwitchOrigin::Manual, base + Duration::from_millis(600));
        let accepted = source.poll().expect("window elapsed");
        assert_eq!(accepted.origin, SwitchOrigin::Manual);
    }

    #[test]
    fn origins_share_one_cooldown_window() {
        let (mut source, port) = SwitchSource::new(Duration::from_millis(300));
        let base = Instant::now();
        port.fire_at(SwitchOrigin::Blink, base);
        port.fire_at(SwitchOrigin::Manual, base + Duration::from_millis(100));
        assert_eq!(
            source.poll().map(|a| a.origin),
            Some(SwitchOrigin::Blink)
        );
        assert!(source.poll().is_none());
    }

    #[test]
    fn per_call_at_most_one_even_across_windows() {
        // Two raw events far enough apart both pass the debounce, but one
        // poll still forwards only the first; the second is dropped because
        // only the live scanning state may consume activations.
        let (mut source, port) = SwitchSource::new(Duration::from_millis(100));
        let base = Instant::now();
        port.fire_at(SwitchOrigin::Blink, base);
        port.fire_at(SwitchOrigin::Blink, base + Duration::from_millis(500));
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
    }
}
