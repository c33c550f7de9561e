use augenblick::log_debug;
use augenblick::switch::{SwitchOrigin, SwitchPort};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use std::thread;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum UiEvent {
    Quit,
}

/// Forward terminal input: Enter and right-click become manual switch
/// activations, q / Esc / Ctrl-C end the session.
pub(crate) fn spawn_input_thread(port: SwitchPort, tx: Sender<UiEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                log_debug(&format!("input read error: {err}"));
                let _ = tx.send(UiEvent::Quit);
                return;
            }
        };
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Enter => port.fire(SwitchOrigin::Manual),
                KeyCode::Esc | KeyCode::Char('q') => {
                    let _ = tx.send(UiEvent::Quit);
                    return;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    let _ = tx.send(UiEvent::Quit);
                    return;
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Right) = mouse.kind {
                    port.fire(SwitchOrigin::Manual);
                }
            }
            _ => {}
        }
    })
}
