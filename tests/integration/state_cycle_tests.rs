//! State-cycle tests: SentryService → FSM → mocks.

use sentry::app::events::SentryEvent;
use sentry::error::SensorError;
use sentry::fsm::{StateId, TransitionReason};
use sentry::sounds::Cue;

use crate::mock_hw::{MockAudio, RecordingSink, ScriptedMotion, fast_config, make_service, sounds};

const FULL_CYCLE: [StateId; 7] = [
    StateId::Standby,
    StateId::PoweringOn,
    StateId::Unauthorized,
    StateId::Warning,
    StateId::Alarm,
    StateId::PoweringDown,
    StateId::Standby,
];

#[test]
fn constant_motion_walks_full_cycle_for_any_seed() {
    let config = fast_config();
    for seed in 0..8 {
        let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::always(true), seed);
        let mut sink = RecordingSink::default();
        service.start(&mut sink);

        for _ in 0..6 {
            assert!(service.step(&mut sink).is_some(), "seed {seed}: every step should transition");
        }

        assert_eq!(sink.visited(), FULL_CYCLE, "seed {seed}");
        assert_eq!(service.completed_cycles(), 1);
    }
}

#[test]
fn full_cycle_plays_every_cue_once() {
    let config = fast_config();
    let set = sounds(&config);
    let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::always(true), 11);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);
    for _ in 0..6 {
        service.step(&mut sink);
    }

    let audio = service.audio();
    for cue in [Cue::PowerOn, Cue::Unauthorized, Cue::Warning, Cue::Alarm, Cue::PowerDown] {
        assert_eq!(audio.plays_of(&set, cue), 1, "{cue}");
    }
    assert_eq!(audio.played.len(), 5);
}

#[test]
fn standby_polls_without_transition() {
    let config = fast_config();
    let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::always(false), 1);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..5 {
        assert_eq!(service.step(&mut sink), None);
    }
    assert_eq!(service.state(), StateId::Standby);
    assert_eq!(service.motion().reads, 5);
    assert!(service.audio().played.is_empty());
    assert!(service.light().writes.is_empty());
}

#[test]
fn departure_after_unauthorized_skips_warning() {
    let config = fast_config();
    let set = sounds(&config);
    // Standby sample, then the end-of-wait sample in Unauthorized.
    let motion = ScriptedMotion::script([Ok(true), Ok(false)], false);
    let mut service = make_service(&config, MockAudio::default(), motion, 2);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..4 {
        service.step(&mut sink);
    }

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
    assert_eq!(service.audio().plays_of(&set, Cue::Warning), 0);
    assert_eq!(service.audio().plays_of(&set, Cue::Alarm), 0);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            SentryEvent::StateChanged {
                from: StateId::Unauthorized,
                to: StateId::PoweringDown,
                reason: TransitionReason::MotionCleared,
            }
        )),
        1
    );
}

#[test]
fn departure_after_warning_skips_alarm() {
    let config = fast_config();
    let set = sounds(&config);
    let motion = ScriptedMotion::script([Ok(true), Ok(true), Ok(false)], false);
    let mut service = make_service(&config, MockAudio::default(), motion, 3);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..5 {
        service.step(&mut sink);
    }

    assert_eq!(
        sink.visited(),
        vec![
            StateId::Standby,
            StateId::PoweringOn,
            StateId::Unauthorized,
            StateId::Warning,
            StateId::PoweringDown,
            StateId::Standby,
        ]
    );
    assert_eq!(service.audio().plays_of(&set, Cue::Warning), 1);
    assert_eq!(service.audio().plays_of(&set, Cue::Alarm), 0);
}

#[test]
fn light_settles_at_pattern_terminal_values() {
    let mut config = fast_config();
    config.effects.power_on_intensity = 80;
    let audio = MockAudio::default().with_duration("sounds/powerdown.mp3", std::time::Duration::from_millis(150));
    let mut service = make_service(&config, audio, ScriptedMotion::always(true), 4);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    service.step(&mut sink); // Standby -> PoweringOn
    service.step(&mut sink); // PoweringOn: flicker + power_on
    assert_eq!(service.state(), StateId::Unauthorized);
    assert_eq!(service.light().last(), Some(80));

    for _ in 0..3 {
        service.step(&mut sink);
    }
    assert_eq!(service.state(), StateId::PoweringDown);
    service.step(&mut sink); // fade + power_down
    assert_eq!(service.state(), StateId::Standby);
    assert_eq!(service.light().last(), Some(0));
}

#[test]
fn sensor_fault_in_standby_means_no_motion() {
    let config = fast_config();
    let motion = ScriptedMotion::script([Err(SensorError::GpioReadFailed)], false);
    let mut service = make_service(&config, MockAudio::default(), motion, 5);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    assert_eq!(service.step(&mut sink), None);
    assert_eq!(service.state(), StateId::Standby);
    assert_eq!(
        sink.count(|e| *e == SentryEvent::SensorFault(SensorError::GpioReadFailed)),
        1
    );
}

#[test]
fn sensor_fault_during_escalation_stands_down() {
    let config = fast_config();
    let motion = ScriptedMotion::script([Ok(true), Err(SensorError::GpioReadFailed)], true);
    let mut service = make_service(&config, MockAudio::default(), motion, 6);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    service.step(&mut sink);
    service.step(&mut sink);
    let change = service.step(&mut sink).expect("Unauthorized always transitions");
    assert_eq!(change.from, StateId::Unauthorized);
    assert_eq!(change.to, StateId::PoweringDown);
}

#[test]
fn cycles_repeat() {
    let config = fast_config();
    let mut service = make_service(&config, MockAudio::default(), ScriptedMotion::always(true), 7);
    let mut sink = RecordingSink::default();
    service.start(&mut sink);

    for _ in 0..18 {
        service.step(&mut sink);
    }
    assert_eq!(service.completed_cycles(), 3);
    assert_eq!(service.state(), StateId::Standby);
}
