use super::defaults::{
    MAX_COOLDOWN_MS, MAX_DWELL_MS, MAX_HOLD_MS, MAX_INACTIVITY_MS, MAX_SPEECH_TIMEOUT_MS,
    MIN_COOLDOWN_MS, MIN_DWELL_MS,
};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;
use std::time::Duration;

use crate::engine::Timing;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the narrator command.
    pub fn validate(&mut self) -> Result<()> {
        for (flag, value) in [
            ("--item-dwell-ms", self.item_dwell_ms),
            ("--row-dwell-ms", self.row_dwell_ms),
            ("--key-dwell-ms", self.key_dwell_ms),
        ] {
            if !(MIN_DWELL_MS..=MAX_DWELL_MS).contains(&value) {
                bail!("{flag} must be between {MIN_DWELL_MS} and {MAX_DWELL_MS} ms, got {value}");
            }
        }

        if self.lead_in_ms > MAX_HOLD_MS {
            bail!("--lead-in-ms must be at most {MAX_HOLD_MS} ms, got {}", self.lead_in_ms);
        }
        for (flag, value) in [
            ("--confirm-hold-ms", self.confirm_hold_ms),
            ("--token-hold-ms", self.token_hold_ms),
            ("--row-hold-ms", self.row_hold_ms),
        ] {
            if value > MAX_HOLD_MS {
                bail!("{flag} must be at most {MAX_HOLD_MS} ms, got {value}");
            }
        }

        if !(MIN_COOLDOWN_MS..=MAX_COOLDOWN_MS).contains(&self.cooldown_ms) {
            bail!(
                "--cooldown-ms must be between {MIN_COOLDOWN_MS} and {MAX_COOLDOWN_MS} ms, got {}",
                self.cooldown_ms
            );
        }

        // The watchdog measures user silence across whole scan passes, so it
        // has to outlast several dwells or it would fire mid-pass.
        let slowest_dwell = self
            .item_dwell_ms
            .max(self.row_dwell_ms)
            .max(self.key_dwell_ms);
        if self.inactivity_ms < slowest_dwell.saturating_mul(3) {
            bail!(
                "--inactivity-ms ({}) must be at least three times the slowest dwell ({slowest_dwell} ms)",
                self.inactivity_ms
            );
        }
        if self.inactivity_ms > MAX_INACTIVITY_MS {
            bail!(
                "--inactivity-ms must be at most {MAX_INACTIVITY_MS} ms, got {}",
                self.inactivity_ms
            );
        }

        if self.speech_timeout_ms == 0 || self.speech_timeout_ms > MAX_SPEECH_TIMEOUT_MS {
            bail!(
                "--speech-timeout-ms must be between 1 and {MAX_SPEECH_TIMEOUT_MS} ms, got {}",
                self.speech_timeout_ms
            );
        }

        if self.synth_ms_per_char > 1_000 {
            bail!(
                "--synth-ms-per-char must be at most 1000 ms, got {}",
                self.synth_ms_per_char
            );
        }

        if !self.muted {
            let words = shell_words::split(&self.narrator_cmd)
                .map_err(|err| anyhow::anyhow!("--narrator-cmd is not parseable: {err}"))?;
            if words.is_empty() {
                bail!("--narrator-cmd cannot be empty unless --muted is set");
            }
        }

        Ok(())
    }

    /// Snapshot the engine-facing timing values.
    pub fn engine_timing(&self) -> Timing {
        Timing {
            lead_in: Duration::from_millis(self.lead_in_ms),
            inactivity: Duration::from_millis(self.inactivity_ms),
        }
    }
}
