//! petal - terminal chorus pedal
//!
//! Run with: cargo run --bin petal [-- --terrarium]
//!
//! The keyboard stands in for the knobs and footswitches, the TUI for the
//! LEDs. Audio comes from the default input device when one is available,
//! otherwise from a built-in test tone.
//!
//! Logging is off unless RUST_LOG is set, and then goes to `petal.log` in
//! the working directory; the TUI owns the terminal.

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{bail, Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::Layout;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    if let Some(filter) = log_filter(std::env::var("RUST_LOG").ok()) {
        let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let layout = parse_layout(std::env::args().skip(1))?;

    let terminal = ratatui::init();
    let res = app::run(terminal, layout);
    ratatui::restore();
    res
}

const LOG_FILE: &str = "petal.log";

/// Filter from a RUST_LOG value; `None` when unset or blank. Invalid
/// directives fall back to `warn`.
fn log_filter(rust_log: Option<String>) -> Option<EnvFilter> {
    let directives = rust_log.filter(|v| !v.trim().is_empty())?;
    Some(EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn")))
}

fn parse_layout(args: impl Iterator<Item = String>) -> EyreResult<Layout> {
    let mut layout = Layout::Petal;
    for arg in args {
        match arg.as_str() {
            "--petal" => layout = Layout::Petal,
            "--terrarium" => layout = Layout::Terrarium,
            other => bail!("unknown argument `{other}` (expected --petal or --terrarium)"),
        }
    }
    Ok(layout)
}
