//! Integration tests for the Device main loop

mod common;
use common::*;

use core::cell::Cell;
use keypad_stopwatch::display::{SEGMENT_PATTERNS, DECIMAL_POINT};
use keypad_stopwatch::{
    Action, BuzzerPattern, Config, Device, DigitPosition, Indicator, KeyCode, Signals,
    SystemState,
};

type TestDevice<'a> = Device<'a, MockMatrix<'a>, MockButton<'a>, MockPanel, MockDelay>;

struct Rig {
    keys: Keys,
    button: Cell<bool>,
    signals: Signals,
}

impl Rig {
    fn new() -> Self {
        Self {
            keys: Keys::new(),
            button: Cell::new(false),
            signals: Signals::new(),
        }
    }

    fn device(&self, config: Config) -> TestDevice<'_> {
        Device::new(
            config,
            self.keys.matrix(),
            MockButton::new(&self.button),
            MockPanel::new(),
            MockDelay::new(),
            &self.signals,
        )
    }
}

/// Presses and releases a key over two loop iterations, returning the action
fn click(rig: &Rig, device: &mut TestDevice<'_>, key: KeyCode) -> Option<Action> {
    rig.keys.hold(key);
    assert_eq!(device.run_once().key_action, None);
    rig.keys.release(key);
    device.run_once().key_action
}

fn click_button(rig: &Rig, device: &mut TestDevice<'_>) -> Option<Action> {
    rig.button.set(true);
    device.run_once();
    rig.button.set(false);
    device.run_once().button_action
}

fn deliver_ticks(rig: &Rig, device: &mut TestDevice<'_>, count: u32) {
    for _ in 0..count {
        rig.signals.tick();
    }
    device.run_once();
}

#[test]
fn starts_idle_with_zeros_on_display() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    device.run_once();

    let panel = device.panel();
    assert_eq!(device.stopwatch().state(), SystemState::Idle);
    assert_eq!(panel.indicator, Some(Indicator::Idle));
    for position in DigitPosition::REFRESH_ORDER {
        assert_eq!(panel.digit(position), Some(SEGMENT_PATTERNS[0]));
    }
    assert!(!panel.buzzer);
}

#[test]
fn key_acts_once_on_release() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    rig.keys.hold(KeyCode::START_PAUSE);
    for _ in 0..5 {
        assert_eq!(device.run_once().key_action, None);
        assert_eq!(device.stopwatch().state(), SystemState::Idle);
    }

    rig.keys.release(KeyCode::START_PAUSE);
    assert_eq!(device.run_once().key_action, Some(Action::ToggleRun));
    assert_eq!(device.stopwatch().state(), SystemState::Counting);

    assert_eq!(device.run_once().key_action, None);
    assert_eq!(device.stopwatch().state(), SystemState::Counting);
}

#[test]
fn ticks_from_signals_advance_counting_only() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    deliver_ticks(&rig, &mut device, 4);
    assert_eq!(device.stopwatch().elapsed(), 0);

    click(&rig, &mut device, KeyCode::START_PAUSE);
    deliver_ticks(&rig, &mut device, 4);
    assert_eq!(device.stopwatch().elapsed(), 4);
    assert_eq!(device.panel().heartbeat_toggles, 4);

    click(&rig, &mut device, KeyCode::START_PAUSE);
    deliver_ticks(&rig, &mut device, 4);
    assert_eq!(device.stopwatch().elapsed(), 4);
    assert_eq!(device.panel().heartbeat_toggles, 4);
}

#[test]
fn alarm_editing_with_increment_button() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    assert_eq!(click(&rig, &mut device, KeyCode::ALARM), Some(Action::EnterAlarmSet));
    for _ in 0..3 {
        assert_eq!(click_button(&rig, &mut device), Some(Action::IncrementAlarm));
    }
    assert_eq!(device.stopwatch().alarm_time().seconds(), 3);
    assert_eq!(device.panel().indicator, Some(Indicator::AlarmSet));
    assert_eq!(
        device.panel().digit(DigitPosition::Tens),
        Some(SEGMENT_PATTERNS[3] & !DECIMAL_POINT)
    );

    assert_eq!(click(&rig, &mut device, KeyCode::ALARM), Some(Action::LeaveAlarmSet));
    assert_eq!(click_button(&rig, &mut device), None);
    assert_eq!(device.stopwatch().alarm_time().seconds(), 3);
}

#[test]
fn held_key_locks_out_increment_button() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());
    click(&rig, &mut device, KeyCode::ALARM);

    rig.keys.hold(KeyCode::new(7).unwrap());
    device.run_once();
    assert_eq!(click_button(&rig, &mut device), None);
    assert_eq!(device.stopwatch().alarm_time().seconds(), 0);

    rig.keys.release_all();
    device.run_once();
    assert_eq!(click_button(&rig, &mut device), Some(Action::IncrementAlarm));
}

#[test]
fn held_increment_button_locks_out_keypad_in_alarm_set() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());
    click(&rig, &mut device, KeyCode::ALARM);

    rig.button.set(true);
    device.run_once();
    assert_eq!(click(&rig, &mut device, KeyCode::START_PAUSE), None);
    assert_eq!(click(&rig, &mut device, KeyCode::ALARM), None);
    assert_eq!(device.stopwatch().state(), SystemState::AlarmSet);

    rig.button.set(false);
    assert_eq!(device.run_once().button_action, Some(Action::IncrementAlarm));
    assert_eq!(device.stopwatch().alarm_time().seconds(), 1);

    assert_eq!(click(&rig, &mut device, KeyCode::START_PAUSE), Some(Action::ToggleRun));
    assert_eq!(device.stopwatch().state(), SystemState::Counting);
}

#[test]
fn increment_wins_over_key_released_in_same_iteration() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());
    click(&rig, &mut device, KeyCode::ALARM);

    rig.keys.hold(KeyCode::ALARM);
    rig.button.set(true);
    device.run_once();

    rig.keys.release(KeyCode::ALARM);
    rig.button.set(false);
    let cycle = device.run_once();

    assert_eq!(cycle.button_action, Some(Action::IncrementAlarm));
    assert_eq!(cycle.key_action, None);
    assert_eq!(device.stopwatch().state(), SystemState::AlarmSet);
    assert_eq!(device.stopwatch().alarm_time().seconds(), 1);
}

#[test]
fn stuck_key_never_acts_but_time_keeps_counting() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());
    click(&rig, &mut device, KeyCode::START_PAUSE);

    rig.keys.hold(KeyCode::LAP_RESET);
    for _ in 0..10 {
        deliver_ticks(&rig, &mut device, 1);
    }

    assert_eq!(device.stopwatch().elapsed(), 10);
    assert_eq!(device.stopwatch().laps().recorded_count(), 0);
}

#[test]
fn alarm_still_sounds_while_key_stuck() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    click(&rig, &mut device, KeyCode::ALARM);
    click_button(&rig, &mut device);
    click(&rig, &mut device, KeyCode::ALARM);
    click(&rig, &mut device, KeyCode::START_PAUSE);

    rig.keys.hold(KeyCode::LAP_RESET);
    device.run_once();
    for _ in 0..10 {
        rig.signals.tick();
    }

    let cycle = device.run_once();
    assert!(cycle.alarm_sounded);
    assert_eq!(cycle.key_action, None);
    assert_eq!(device.stopwatch().laps().recorded_count(), 0);
}

#[test]
fn alarm_sounds_blocking_buzzer_pattern() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    click(&rig, &mut device, KeyCode::ALARM);
    click_button(&rig, &mut device);
    click(&rig, &mut device, KeyCode::ALARM);
    click(&rig, &mut device, KeyCode::START_PAUSE);

    for _ in 0..9 {
        rig.signals.tick();
        assert!(!device.run_once().alarm_sounded);
    }

    rig.signals.tick();
    let cycle = device.run_once();
    assert!(cycle.alarm_sounded);

    let panel = device.panel();
    assert!(!panel.buzzer);
    // Initial off, six toggles, forced off
    assert_eq!(
        panel.buzzer_history.as_slice(),
        &[false, true, false, true, false, true, false, false]
    );

    // Ticks arriving during the alarm are applied on the next iteration
    for _ in 0..6 {
        rig.signals.tick();
    }
    let cycle = device.run_once();
    assert_eq!(cycle.pending.ticks, 6);
    assert!(!cycle.alarm_sounded);
    assert_eq!(device.stopwatch().elapsed(), 16);
}

#[test]
fn buzzer_pattern_blocks_for_configured_time() {
    let rig = Rig::new();
    let config = Config::builder()
        .buzzer(BuzzerPattern::new(4, 250))
        .digit_hold_us(0)
        .build()
        .unwrap();
    let mut device = rig.device(config);

    // Alarm at 0 fires as soon as counting starts
    click(&rig, &mut device, KeyCode::START_PAUSE);

    let (_, _, panel, delay) = device.release();
    assert_eq!(delay.total_us(), 1_000);
    assert_eq!(panel.buzzer_history.len(), 1 + 4 + 1);
}

#[test]
fn lap_review_through_signals() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    click(&rig, &mut device, KeyCode::START_PAUSE);
    deliver_ticks(&rig, &mut device, 5);
    click(&rig, &mut device, KeyCode::LAP_RESET);
    deliver_ticks(&rig, &mut device, 7);
    click(&rig, &mut device, KeyCode::LAP_RESET);
    deliver_ticks(&rig, &mut device, 8);
    click(&rig, &mut device, KeyCode::LAP_RESET);

    let laps = device.stopwatch().laps();
    assert_eq!([laps.read_lap(0), laps.read_lap(1), laps.read_lap(2)], [5, 7, 8]);

    click(&rig, &mut device, KeyCode::START_PAUSE);
    // Lap-advance edges while paused are dropped
    rig.signals.lap_advance();
    device.run_once();
    assert_eq!(device.stopwatch().laps().review_index(), 0);

    click(&rig, &mut device, KeyCode::REVIEW);
    assert_eq!(device.stopwatch().state(), SystemState::Check);
    assert_eq!(device.panel().digit(DigitPosition::Thousands), Some(SEGMENT_PATTERNS[1]));
    assert_eq!(device.panel().digit(DigitPosition::Units), Some(SEGMENT_PATTERNS[5]));

    rig.signals.lap_advance();
    device.run_once();
    assert_eq!(device.stopwatch().laps().review_index(), 1);
    assert_eq!(device.panel().digit(DigitPosition::Thousands), Some(SEGMENT_PATTERNS[2]));
    assert_eq!(device.panel().digit(DigitPosition::Units), Some(SEGMENT_PATTERNS[7]));

    for _ in 0..5 {
        rig.signals.lap_advance();
    }
    device.run_once();
    assert_eq!(device.stopwatch().laps().review_index(), 1);

    // Leaving and re-entering review starts again from the first lap
    click(&rig, &mut device, KeyCode::REVIEW);
    click(&rig, &mut device, KeyCode::REVIEW);
    assert_eq!(device.stopwatch().laps().review_index(), 0);
}

#[test]
fn reset_returns_to_idle_with_zero_elapsed() {
    let rig = Rig::new();
    let mut device = rig.device(Config::default());

    click(&rig, &mut device, KeyCode::START_PAUSE);
    deliver_ticks(&rig, &mut device, 33);
    click(&rig, &mut device, KeyCode::START_PAUSE);
    assert_eq!(click(&rig, &mut device, KeyCode::LAP_RESET), Some(Action::Reset));

    assert_eq!(device.stopwatch().state(), SystemState::Idle);
    assert_eq!(device.stopwatch().elapsed(), 0);
    assert_eq!(device.panel().indicator, Some(Indicator::Idle));
}
