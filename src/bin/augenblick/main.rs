//! Terminal front end for the scanning engine: wires the switch channels,
//! the narrator, and the selected flow together, then runs the event loop.

mod blink;
mod display;
mod input;
mod terminal;

use anyhow::Result;
use crossbeam_channel::{select, unbounded, Receiver};
use std::panic;
use std::time::{Duration, Instant};

use augenblick::config::{AppConfig, DialogKind};
use augenblick::dialog::{needs_dialog, pain_dialog, AssessmentFlow};
use augenblick::engine::{DialogFlow, Engine, EngineStatus};
use augenblick::keyboard::KeyboardFlow;
use augenblick::speech::{ProcessNarrator, SpeechGate};
use augenblick::store::{JsonlSink, NullSink, Profile, SelectionSink};
use augenblick::switch::SwitchSource;
use augenblick::{init_logging, init_tracing, log_debug, log_panic};

use input::UiEvent;

const TICK_MS: u64 = 50;

fn main() {
    let config = match AppConfig::parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("augenblick: {err:#}");
            std::process::exit(2);
        }
    };

    init_logging(&config);
    init_tracing(&config);
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        log_panic(info);
        previous_hook(info);
    }));

    if config.list_layout {
        display::print_layout();
        return;
    }

    if let Err(err) = run(config) {
        eprintln!("augenblick: {err:#}");
        std::process::exit(1);
    }
}

fn build_speech_gate(config: &AppConfig) -> Result<SpeechGate> {
    let per_char = Duration::from_millis(config.synth_ms_per_char);
    if config.muted {
        return Ok(SpeechGate::muted(per_char));
    }
    let narrator = ProcessNarrator::from_command_line(&config.narrator_cmd)?;
    Ok(SpeechGate::new(
        Box::new(narrator),
        Duration::from_millis(config.speech_timeout_ms),
        per_char,
    ))
}

fn build_sink(config: &AppConfig) -> Box<dyn SelectionSink> {
    match &config.records_path {
        Some(path) => Box::new(JsonlSink::new(path.clone())),
        None => Box::new(NullSink),
    }
}

fn run(config: AppConfig) -> Result<()> {
    let speech = build_speech_gate(&config)?;
    let sink = build_sink(&config);
    let timing = config.engine_timing();

    let (mut source, port) = SwitchSource::new(Duration::from_millis(config.cooldown_ms));
    let (ui_tx, ui_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();

    let guard = terminal::RawModeGuard::enable()?;
    input::spawn_input_thread(port.clone(), ui_tx);
    if let Some(pipe) = &config.blink_pipe {
        blink::spawn_blink_reader(pipe.clone(), port.clone());
    }

    let result = if config.keyboard {
        let profile = Profile::load(&config.profile_path);
        let flow = KeyboardFlow::new(
            profile,
            config.profile_path.clone(),
            Duration::from_millis(config.row_dwell_ms),
            Duration::from_millis(config.key_dwell_ms),
            Duration::from_millis(config.row_hold_ms),
            Duration::from_millis(config.token_hold_ms),
        );
        let engine = Engine::new(flow, speech, timing, sink).with_events(event_tx);
        run_engine(engine, &mut source, &ui_rx, &event_rx)
    } else {
        let spec = match config.dialog {
            DialogKind::Pain => pain_dialog(),
            DialogKind::Needs => needs_dialog(),
        };
        let flow = AssessmentFlow::new(
            spec,
            Duration::from_millis(config.item_dwell_ms),
            Duration::from_millis(config.confirm_hold_ms),
        );
        let engine = Engine::new(flow, speech, timing, sink).with_events(event_tx);
        run_engine(engine, &mut source, &ui_rx, &event_rx)
    };

    drop(guard);
    result
}

fn run_engine<F: DialogFlow>(
    mut engine: Engine<F>,
    source: &mut SwitchSource,
    ui_rx: &Receiver<UiEvent>,
    event_rx: &Receiver<augenblick::engine::EngineEvent>,
) -> Result<()> {
    engine.start(Instant::now())?;
    let tick = Duration::from_millis(TICK_MS);

    loop {
        display::drain(event_rx);

        if let Some(activation) = source.poll() {
            if engine.on_activation(activation, Instant::now())? == EngineStatus::Exited {
                break;
            }
            continue;
        }

        if engine.tick(Instant::now())? == EngineStatus::Exited {
            break;
        }

        select! {
            recv(ui_rx) -> msg => match msg {
                Ok(UiEvent::Quit) | Err(_) => {
                    log_debug("quit requested");
                    break;
                }
            },
            default(tick) => {}
        }
    }

    engine.stop();
    display::drain(event_rx);
    Ok(())
}
