//! Log output: what an operator sees in the intrusion log.
//!
//! A capturing `log::Log` is installed once for this test binary.  Lines
//! are keyed by thread so parallel tests only see their own output.

use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use log::{LevelFilter, Log, Metadata, Record};
use sentry::adapters::log_sink::LogEventSink;
use sentry::fsm::StateId;
use sentry::shutdown::{ShutdownCoordinator, ShutdownFlag, ShutdownOutcome, ShutdownReason};

use crate::mock_hw::{MockAudio, RecordingSink, ScriptedMotion, fast_config, make_service, step_until};

const STANDBY_LINE: &str = "STANDBY: system in standby";

struct CaptureLogger {
    lines: Mutex<Vec<(ThreadId, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.lines
            .lock()
            .unwrap()
            .push((thread::current().id(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

fn install() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in this binary");
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Lines logged so far by the calling thread.
fn own_lines() -> Vec<String> {
    let me = thread::current().id();
    LOGGER
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, _)| *id == me)
        .map(|(_, line)| line.clone())
        .collect()
}

fn count(lines: &[String], text: &str) -> usize {
    lines.iter().filter(|l| l.as_str() == text).count()
}

#[test]
fn each_shutdown_trigger_logs_one_shutdown_line() {
    install();
    let config = fast_config();
    let flag = ShutdownFlag::new();
    let coordinator = ShutdownCoordinator::new(&flag);
    let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::always(false), 41);
    let mut sink = LogEventSink::new();
    service.start(&mut sink);

    let first = service.shutdown(&coordinator, ShutdownReason::Interrupt, &mut sink);
    let second = service.shutdown(&coordinator, ShutdownReason::LoopExited, &mut sink);
    assert_eq!(first, ShutdownOutcome::Completed);
    assert_eq!(second, ShutdownOutcome::AlreadyShuttingDown);

    let shutdown_lines: Vec<String> = own_lines()
        .into_iter()
        .filter(|l| l.starts_with("SHUTDOWN"))
        .collect();
    assert_eq!(
        shutdown_lines,
        vec![
            "SHUTDOWN | state=PoweringDown | reason=interrupt".to_string(),
            "SHUTDOWN | already shutting down | ignored reason=main loop exited".to_string(),
        ]
    );
    assert_eq!(
        count(&own_lines(), "RELEASE | light, audio and sensor released"),
        1
    );
}

#[test]
fn standby_is_announced_once_per_entry() {
    install();
    let config = fast_config();
    // One intruder visit between two long idle stretches.
    let script = [Ok(false), Ok(false), Ok(false), Ok(true), Ok(false)];
    let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::script(script, false), 42);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..3 {
        assert_eq!(service.step(&mut sink), None);
    }
    assert_eq!(count(&own_lines(), STANDBY_LINE), 1);

    step_until(&mut service, &mut sink, StateId::Standby, 10);
    for _ in 0..4 {
        assert_eq!(service.step(&mut sink), None);
    }

    assert_eq!(service.state(), StateId::Standby);
    assert_eq!(count(&own_lines(), STANDBY_LINE), 2);
}
