use augenblick::log_debug;
use augenblick::switch::{SwitchOrigin, SwitchPort};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const REOPEN_DELAY_MS: u64 = 250;

/// Bridge to the external blink detector: every line written to the pipe is
/// one detected blink. A FIFO hits EOF whenever the writer disconnects, so
/// the reader keeps reopening until the pipe disappears.
pub(crate) fn spawn_blink_reader(path: PathBuf, port: SwitchPort) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                log_debug(&format!(
                    "blink pipe '{}' unavailable: {err}",
                    path.display()
                ));
                return;
            }
        };
        for line in BufReader::new(file).lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(_) => port.fire(SwitchOrigin::Blink),
                Err(err) => {
                    log_debug(&format!("blink pipe read error: {err}"));
                    break;
                }
            }
        }
        thread::sleep(Duration::from_millis(REOPEN_DELAY_MS));
    })
}
