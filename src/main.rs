//! Sentry — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  PiHardware          RodioPlayback   LogEventSink            │
//! │  (Light + Motion)    (Audio)         (EventSink)             │
//! │  JsonConfigFile (ConfigPort)                                 │
//! │                                                              │
//! │  ─────────────────── Port Trait Boundary ──────────────────  │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │           SentryService (pure logic + run_synced)      │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  SIGINT/SIGTERM ──▶ SHUTDOWN flag ──▶ ShutdownCoordinator    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use sentry::adapters::audio::RodioPlayback;
use sentry::adapters::config_file::{DEFAULT_CONFIG_PATH, JsonConfigFile};
use sentry::adapters::hardware::PiHardware;
use sentry::adapters::log_sink::LogEventSink;
use sentry::app::ports::ConfigPort;
use sentry::app::service::SentryService;
use sentry::logging;
use sentry::shutdown::{self, ShutdownCoordinator, ShutdownReason};
use sentry::sounds::SoundSet;

#[derive(Debug, Parser)]
#[command(version, about = "Motion-triggered light and sound deterrent")]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Rotating log file.
    #[arg(long, default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ── 1. Logging ────────────────────────────────────────────
    let _log_guard = logging::init(&args.log_file);
    info!("Sentry v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Config + sounds (fatal on error) ───────────────────
    let config = JsonConfigFile::new(&args.config)
        .load()
        .with_context(|| format!("loading {}", args.config.display()))?;
    let sounds = SoundSet::from_paths(&config.sounds)?;
    sounds.ensure_present()?;

    // ── 3. Hardware ───────────────────────────────────────────
    let hw = PiHardware::init(&config)?;
    let audio = RodioPlayback::open_default().context("opening audio output")?;

    // ── 4. Signals ────────────────────────────────────────────
    shutdown::register_signal_handlers().context("registering signal handlers")?;
    let coordinator = ShutdownCoordinator::global();

    // ── 5. Service ────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = SentryService::new(
        &config,
        sounds,
        hw.light,
        audio,
        hw.pir,
        StdRng::from_entropy(),
    );
    service.start(&mut sink);

    info!("System ready. Entering control loop.");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| service.run(&coordinator, &mut sink)));

    // ── 6. Shutdown ───────────────────────────────────────────
    let reason = match outcome {
        Ok(()) if coordinator.is_requested() => ShutdownReason::Interrupt,
        Ok(()) => ShutdownReason::LoopExited,
        Err(_) => {
            error!("control loop panicked");
            ShutdownReason::LoopExited
        }
    };
    service.shutdown(&coordinator, reason, &mut sink);

    info!("Sentry stopped");
    Ok(())
}
