//! Narration gate: at most one utterance at a time, settlement always bounded.
//!
//! The engine never blocks on the narrator. [`SpeechGate::speak`] cancels any
//! prior utterance, hands the text to the external narrator, and returns a
//! [`SpeechTicket`] the engine polls each tick. A ticket settles when the
//! narrator reports completion, when the hard timeout passes, or immediately
//! when synthesis fails; narration is best-effort and must never stall the
//! scan. While muted, tickets settle after a synthetic delay proportional to
//! the text length so pacing stays identical with and without audio.

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver};
use regex::Regex;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use crate::log_debug;

/// External speech synthesizer. `begin` starts one utterance and returns a
/// handle that reports completion; `cancel` stops whatever is in flight.
pub trait Narrator: Send {
    fn begin(&mut self, text: &str) -> Result<SpeechHandle>;
    fn cancel(&mut self);
}

/// Completion signal for one utterance. The sender side is dropped (or sends)
/// when audible output has finished.
pub struct SpeechHandle {
    pub(crate) done: Receiver<()>,
}

impl SpeechHandle {
    pub fn new(done: Receiver<()>) -> Self {
        Self { done }
    }

    /// Handle that is already settled, for narrators with nothing to play.
    pub fn settled() -> Self {
        let (tx, rx) = bounded(1);
        let _ = tx.send(());
        Self { done: rx }
    }
}

/// Poll-friendly settlement token for one `speak` call.
#[derive(Debug)]
pub struct SpeechTicket {
    done: Option<Receiver<()>>,
    deadline: Instant,
    settled: bool,
}

impl SpeechTicket {
    /// True once narration completed, errored, or timed out. Latches.
    pub fn settled(&mut self, now: Instant) -> bool {
        if self.settled {
            return true;
        }
        if let Some(done) = &self.done {
            match done.try_recv() {
                Ok(()) => self.settled = true,
                Err(crossbeam_channel::TryRecvError::Disconnected) => self.settled = true,
                Err(crossbeam_channel::TryRecvError::Empty) => {}
            }
        }
        if !self.settled && now >= self.deadline {
            self.settled = true;
        }
        self.settled
    }
}

/// Serializes narration and enforces the settlement contract.
pub struct SpeechGate {
    narrator: Option<Box<dyn Narrator>>,
    hard_timeout: Duration,
    per_char: Duration,
    floor: Duration,
}

impl SpeechGate {
    pub fn new(narrator: Box<dyn Narrator>, hard_timeout: Duration, per_char: Duration) -> Self {
        Self {
            narrator: Some(narrator),
            hard_timeout,
            per_char,
            floor: Duration::from_millis(crate::config::DEFAULT_SYNTH_FLOOR_MS),
        }
    }

    /// Gate without a narrator: every ticket settles after the synthetic
    /// delay, keeping callers' pacing intact.
    pub fn muted(per_char: Duration) -> Self {
        Self {
            narrator: None,
            hard_timeout: Duration::ZERO,
            per_char,
            floor: Duration::from_millis(crate::config::DEFAULT_SYNTH_FLOOR_MS),
        }
    }

    fn synthetic_duration(&self, text: &str) -> Duration {
        self.floor + self.per_char * text.chars().count() as u32
    }

    /// Begin narrating `text`, cancelling any active utterance first.
    pub fn speak(&mut self, text: &str, now: Instant) -> SpeechTicket {
        self.cancel();
        let text = sanitize_narration(text);
        if text.is_empty() {
            return SpeechTicket {
                done: None,
                deadline: now,
                settled: false,
            };
        }

        let Some(narrator) = self.narrator.as_mut() else {
            return SpeechTicket {
                done: None,
                deadline: now + self.synthetic_duration(&text),
                settled: false,
            };
        };

        match narrator.begin(&text) {
            Ok(handle) => SpeechTicket {
                done: Some(handle.done),
                deadline: now + self.hard_timeout,
                settled: false,
            },
            Err(err) => {
                // Synthesis failure degrades to immediate settlement.
                log_debug(&format!("narrator failed to start: {err:#}"));
                SpeechTicket {
                    done: None,
                    deadline: now,
                    settled: false,
                }
            }
        }
    }

    /// Stop the active utterance, if any. Safe to call redundantly.
    pub fn cancel(&mut self) {
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.cancel();
        }
    }
}

/// Collapse whitespace and drop control characters before narration. Bracketed
/// asides like "[pause]" never reach the synthesizer either.
pub fn sanitize_narration(text: &str) -> String {
    static ASIDE_RE: OnceLock<Regex> = OnceLock::new();
    let re = ASIDE_RE.get_or_init(|| {
        Regex::new(r"\[[^\]]*\]").expect("aside regex should compile")
    });
    let without_asides = re.replace_all(text, " ");
    without_asides
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|ch| !ch.is_control())
        .collect()
}

/// Narrator that shells out to a system TTS command (espeak-ng, say, ...),
/// passing the utterance as the final argument. Cancellation kills the child.
pub struct ProcessNarrator {
    program: String,
    args: Vec<String>,
    child: Arc<Mutex<Option<Child>>>,
}

impl ProcessNarrator {
    /// Build from a single command line, e.g. `espeak-ng -v de`.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut words = shell_words::split(command_line)
            .with_context(|| format!("failed to parse narrator command '{command_line}'"))?;
        if words.is_empty() {
            anyhow::bail!("narrator command is empty");
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
            child: Arc::new(Mutex::new(None)),
        })
    }
}

const CHILD_POLL_MS: u64 = 25;

impl Narrator for ProcessNarrator {
    fn begin(&mut self, text: &str) -> Result<SpeechHandle> {
        self.cancel();

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn narrator '{}'", self.program))?;

        {
            let mut slot = self.child.lock().unwrap_or_else(|e| e.into_inner());
            *slot = Some(child);
        }

        let (tx, rx) = bounded(1);
        let slot = self.child.clone();
        thread::spawn(move || {
            loop {
                {
                    let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
                    match guard.as_mut() {
                        None => break, // cancelled from the gate
                        Some(child) => match child.try_wait() {
                            Ok(Some(_)) => {
                                *guard = None;
                                break;
                            }
                            Ok(None) => {}
                            Err(err) => {
                                log_debug(&format!("narrator wait failed: {err}"));
                                *guard = None;
                                break;
                            }
                        },
                    }
                }
                thread::sleep(Duration::from_millis(CHILD_POLL_MS));
            }
            let _ = tx.send(());
        });

        Ok(SpeechHandle::new(rx))
    }

    fn cancel(&mut self) {
        let mut guard = self.child.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(mut child) = guard.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
