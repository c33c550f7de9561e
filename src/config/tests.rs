use super::*;
use clap::Parser;

fn parse(args: &[&str]) -> AppConfig {
    let mut full = vec!["augenblick"];
    full.extend_from_slice(args);
    AppConfig::parse_from(full)
}

#[test]
fn defaults_validate() {
    let mut config = parse(&[]);
    config.validate().expect("defaults should be valid");
    assert_eq!(config.dialog, DialogKind::Pain);
    assert!(!config.keyboard);
}

#[test]
fn rejects_out_of_range_dwell() {
    let mut config = parse(&["--item-dwell-ms", "10"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--item-dwell-ms"));
}

#[test]
fn rejects_inactivity_shorter_than_scan_pace() {
    let mut config = parse(&["--inactivity-ms", "9000", "--row-dwell-ms", "5000"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--inactivity-ms"));
}

#[test]
fn rejects_empty_narrator_unless_muted() {
    let mut config = parse(&["--narrator-cmd", ""]);
    assert!(config.validate().is_err());

    let mut muted = parse(&["--narrator-cmd", "", "--muted"]);
    muted.validate().expect("muted run needs no narrator");
}

#[test]
fn rejects_zero_speech_timeout() {
    let mut config = parse(&["--speech-timeout-ms", "0"]);
    assert!(config.validate().is_err());
}

#[test]
fn engine_timing_snapshot_uses_millis() {
    let mut config = parse(&["--lead-in-ms", "1200", "--inactivity-ms", "20000"]);
    config.validate().expect("valid");
    let timing = config.engine_timing();
    assert_eq!(timing.lead_in.as_millis(), 1200);
    assert_eq!(timing.inactivity.as_millis(), 20000);
}
