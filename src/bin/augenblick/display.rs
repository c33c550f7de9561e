use augenblick::catalog::keyboard as layout;
use augenblick::engine::EngineEvent;
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Print engine output as single status lines. Raw mode is active, so every
/// line ends in an explicit carriage return.
pub(crate) fn drain(rx: &Receiver<EngineEvent>) {
    for event in rx.try_iter() {
        render(&event);
    }
}

fn render(event: &EngineEvent) {
    match event {
        EngineEvent::Prompt { text } => line(&format!("  {text}")),
        EngineEvent::Highlight { index, label } => line(&format!("> [{index}] {label}")),
        EngineEvent::Commit { label } => line(&format!("* {label}")),
        EngineEvent::Confirmation { text } => line(&format!("✓ {text}")),
        EngineEvent::InactivityNotice { text } => line(&format!("! {text}")),
        EngineEvent::TextChanged { text } => line(&format!("Text: {text}")),
        EngineEvent::Exited => line("Sitzung beendet."),
    }
}

fn line(text: &str) {
    let mut out = io::stdout();
    let _ = write!(out, "{text}\r\n");
    let _ = out.flush();
}

/// Dump the keyboard rows with aligned columns.
pub(crate) fn print_layout() {
    let mut rows = Vec::new();
    let mut cell_width = 0;
    for row in 0..layout::row_count() {
        let labels = layout::row_labels(row);
        for label in &labels {
            cell_width = cell_width.max(UnicodeWidthStr::width(label.as_str()));
        }
        rows.push(labels);
    }
    for (index, labels) in rows.iter().enumerate() {
        let cells: Vec<String> = labels
            .iter()
            .map(|label| {
                let pad = cell_width - UnicodeWidthStr::width(label.as_str());
                format!("{label}{}", " ".repeat(pad))
            })
            .collect();
        println!("Zeile {}: {}", index + 1, cells.join(" "));
    }
}
