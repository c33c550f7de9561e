pub mod catalog;
pub mod config;
pub mod dialog;
pub mod engine;
pub mod grammar;
pub mod keyboard;
mod logging;
pub mod scan;
pub mod speech;
pub mod store;
pub mod switch;
mod telemetry;

pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use telemetry::{init_tracing, tracing_log_path};
