//! End-to-end intrusion scenarios with zero timing.

use std::time::{Duration, Instant};

use sentry::app::events::SentryEvent;
use sentry::drivers::light_patterns::PatternMode;
use sentry::fsm::StateId;
use sentry::sounds::Cue;

use crate::mock_hw::{MockAudio, RecordingSink, ScriptedMotion, fast_config, make_service, sounds, step_until};

const POWER_DOWN_CLIP: &str = "sounds/powerdown.mp3";

fn power_down_pattern(sink: &RecordingSink) -> Vec<(PatternMode, Duration)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            SentryEvent::EffectRun {
                cue: Cue::PowerDown,
                pattern,
            } => Some((pattern.mode, pattern.duration)),
            _ => None,
        })
        .collect()
}

#[test]
fn brief_intrusion_fades_for_power_down_clip_length() {
    let config = fast_config();
    let set = sounds(&config);
    let clip_length = Duration::from_millis(300);
    let audio = MockAudio::default().with_duration(POWER_DOWN_CLIP, clip_length);
    // Motion only for the Standby poll; gone by the end of Unauthorized.
    let motion = ScriptedMotion::script([Ok(true)], false);
    let mut service = make_service(&config, audio, motion, 21);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    let started = Instant::now();
    step_until(&mut service, &mut sink, StateId::Standby, 10);

    assert_eq!(
        sink.visited(),
        vec![
            StateId::Standby,
            StateId::PoweringOn,
            StateId::Unauthorized,
            StateId::PoweringDown,
            StateId::Standby,
        ]
    );
    assert_eq!(service.audio().plays_of(&set, Cue::Unauthorized), 1);
    assert_eq!(service.audio().plays_of(&set, Cue::PowerDown), 1);
    assert_eq!(power_down_pattern(&sink), vec![(PatternMode::FadeOut, clip_length)]);
    assert_eq!(service.light().last(), Some(0));
    // The fade runs to the clip's length even though the mock plays instantly.
    assert!(started.elapsed() >= clip_length);
}

#[test]
fn failed_playback_never_stalls_the_cycle() {
    let config = fast_config();
    let audio = MockAudio {
        fail_playback: true,
        ..MockAudio::default()
    };
    let mut service = make_service(&config, audio, ScriptedMotion::always(true), 22);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..6 {
        service.step(&mut sink);
    }

    assert_eq!(service.state(), StateId::Standby);
    assert_eq!(service.completed_cycles(), 1);
    assert_eq!(sink.count(|e| matches!(e, SentryEvent::CuePlayed { ok: false, .. })), 5);
    assert_eq!(sink.count(|e| matches!(e, SentryEvent::CuePlayed { ok: true, .. })), 0);
    assert_eq!(service.light().last(), Some(0));
}

#[test]
fn unknown_clip_length_fades_instantly() {
    let config = fast_config();
    let audio = MockAudio {
        fail_duration: true,
        ..MockAudio::default()
    };
    let motion = ScriptedMotion::script([Ok(true)], false);
    let mut service = make_service(&config, audio, motion, 23);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    step_until(&mut service, &mut sink, StateId::Standby, 10);

    assert_eq!(power_down_pattern(&sink), vec![(PatternMode::FadeOut, Duration::ZERO)]);
    assert_eq!(service.light().last(), Some(0));
}

#[test]
fn unauthorized_pause_is_drawn_from_range() {
    let mut config = fast_config();
    config.timing.unauthorized_pause = (0.05, 0.1);
    let motion = ScriptedMotion::script([Ok(true)], false);
    let mut service = make_service(&config, MockAudio::default(), motion, 24);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    service.step(&mut sink); // -> PoweringOn
    service.step(&mut sink); // -> Unauthorized
    let started = Instant::now();
    service.step(&mut sink); // pause, clip, wait, sample
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(50), "paused only {elapsed:?}");
    assert_eq!(service.state(), StateId::PoweringDown);
}

#[test]
fn alternatives_vary_across_cycles() {
    let config = fast_config();
    let set = sounds(&config);
    let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::always(true), 25);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..(6 * 20) {
        service.step(&mut sink);
    }
    assert_eq!(service.completed_cycles(), 20);

    let mut warnings: Vec<_> = service
        .audio()
        .played
        .iter()
        .filter(|c| set.alternatives(Cue::Warning).contains(c))
        .collect();
    assert_eq!(warnings.len(), 20);
    warnings.sort_by_key(|c| c.path().to_path_buf());
    warnings.dedup();
    assert!(warnings.len() > 1, "20 draws from 5 clips should not all match");
}
