//! End-to-end gesture scenarios driven through the public engine API.
//!
//! Each test plays a realistic contact trace (press, sampled moves, release,
//! interleaved ticks) and asserts on the full command transcript, the way the
//! remote application's input loop drives the engine.

use std::time::{Duration, Instant};

use pad_core::{Command, GestureEngine, TouchSettings};

/// Drives the engine through a trace and collects every emitted command.
struct Harness {
    engine: GestureEngine,
    settings: TouchSettings,
    t0: Instant,
    transcript: Vec<Command>,
}

impl Harness {
    fn new() -> Self {
        Self {
            engine: GestureEngine::new(),
            settings: TouchSettings::default(),
            t0: Instant::now(),
            transcript: Vec::new(),
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    fn start(&mut self, id: u64, x: f64, y: f64, ms: u64) {
        let t = self.at(ms);
        let out = self.engine.on_contact_start(id, x, y, t, &self.settings);
        self.transcript.extend(out);
    }

    fn mv(&mut self, id: u64, x: f64, y: f64) {
        let out = self.engine.on_contact_move(id, x, y, &self.settings);
        self.transcript.extend(out);
    }

    fn end(&mut self, id: u64, ms: u64) {
        let t = self.at(ms);
        self.transcript.extend(self.engine.on_contact_end(id, t));
    }

    fn tick(&mut self, ms: u64) {
        let t = self.at(ms);
        self.transcript.extend(self.engine.on_tick(t));
    }
}

#[test]
fn test_tap_produces_single_left_click() {
    let mut h = Harness::new();

    h.start(1, 200.0, 300.0, 0);
    h.tick(50);
    h.end(1, 90);

    assert_eq!(h.transcript, vec![Command::LeftClick]);
}

#[test]
fn test_swipe_produces_move_stream_and_no_click() {
    let mut h = Harness::new();

    h.start(1, 100.0, 100.0, 0);
    h.mv(1, 110.0, 100.0);
    h.mv(1, 125.0, 102.0);
    h.mv(1, 150.0, 105.0);
    h.end(1, 200);

    assert_eq!(h.transcript.len(), 3);
    assert!(h
        .transcript
        .iter()
        .all(|c| matches!(c, Command::Move { .. })));
}

#[test]
fn test_press_and_hold_fires_right_click_then_silent_release() {
    let mut h = Harness::new();

    h.start(1, 100.0, 100.0, 0);
    // Steady tick cadence like the input loop's timer
    for ms in (0..700).step_by(50) {
        h.tick(ms);
    }
    h.end(1, 700);

    assert_eq!(h.transcript, vec![Command::RightClick]);
}

#[test]
fn test_double_tap_drag_brackets_moves_in_down_and_up() {
    let mut h = Harness::new();

    // Tap
    h.start(1, 100.0, 100.0, 0);
    h.end(1, 60);
    // Press again inside the window and drag
    h.start(2, 100.0, 100.0, 200);
    h.mv(2, 130.0, 100.0);
    h.mv(2, 160.0, 110.0);
    h.end(2, 900);

    assert_eq!(h.transcript.len(), 5);
    assert_eq!(h.transcript[0], Command::LeftClick);
    assert_eq!(h.transcript[1], Command::MouseDown);
    assert!(matches!(h.transcript[2], Command::Move { .. }));
    assert!(matches!(h.transcript[3], Command::Move { .. }));
    assert_eq!(h.transcript[4], Command::MouseUp);
}

#[test]
fn test_drag_lock_survives_long_stationary_hold() {
    // A drag-locked contact held past the right-click delay must not fire a
    // right click mid-drag.
    let mut h = Harness::new();

    h.start(1, 100.0, 100.0, 0);
    h.end(1, 60);
    h.start(2, 100.0, 100.0, 200);
    for ms in (200..1500).step_by(50) {
        h.tick(ms);
    }
    h.end(2, 1500);

    assert_eq!(
        h.transcript,
        vec![Command::LeftClick, Command::MouseDown, Command::MouseUp]
    );
}

#[test]
fn test_two_finger_tap_is_one_right_click() {
    let mut h = Harness::new();

    h.start(1, 150.0, 200.0, 0);
    h.start(2, 190.0, 200.0, 20);
    h.end(1, 110);
    h.end(2, 120);

    assert_eq!(h.transcript, vec![Command::RightClick]);
}

#[test]
fn test_two_finger_vertical_drag_scrolls_and_total_matches() {
    let mut h = Harness::new();

    h.start(1, 150.0, 200.0, 0);
    h.start(2, 190.0, 200.0, 10);
    // Both fingers travel 100 px down in 10 px steps
    for step in 1..=10 {
        let y = 200.0 + f64::from(step) * 10.0;
        h.mv(1, 150.0, y);
        h.mv(2, 190.0, y);
    }
    h.end(1, 600);
    h.end(2, 610);

    let total: i32 = h
        .transcript
        .iter()
        .map(|c| match c {
            Command::Scroll { dy, .. } => *dy,
            other => panic!("unexpected command {other:?}"),
        })
        .sum();
    // 100 px of centroid travel × 0.3 smoothing = 30 units, quantized
    assert_eq!(total, 30);
}

#[test]
fn test_two_finger_horizontal_swipe_fires_navigation_once() {
    let mut h = Harness::new();

    h.start(1, 100.0, 200.0, 0);
    h.start(2, 140.0, 200.0, 10);
    for step in 1..=15 {
        let dx = f64::from(step) * 10.0;
        h.mv(1, 100.0 + dx, 200.0);
        h.mv(2, 140.0 + dx, 200.0);
    }
    h.end(1, 500);
    h.end(2, 510);

    assert_eq!(
        h.transcript,
        vec![Command::Shortcut {
            keys: vec!["alt".to_owned(), "right".to_owned()]
        }]
    );
}

#[test]
fn test_pinch_like_jitter_without_travel_stays_a_tap() {
    // Fingers wiggle under the detection distance: still a two-finger tap
    let mut h = Harness::new();

    h.start(1, 150.0, 200.0, 0);
    h.start(2, 190.0, 200.0, 10);
    h.mv(1, 153.0, 202.0);
    h.mv(2, 188.0, 199.0);
    h.end(1, 150);
    h.end(2, 160);

    assert_eq!(h.transcript, vec![Command::RightClick]);
}

#[test]
fn test_move_then_second_finger_switches_to_scroll_without_click() {
    let mut h = Harness::new();

    // One finger starts moving the pointer
    h.start(1, 100.0, 100.0, 0);
    h.mv(1, 130.0, 100.0);
    let moves_so_far = h.transcript.len();

    // Second finger joins; both pull down far enough to scroll
    h.start(2, 140.0, 100.0, 100);
    h.mv(1, 130.0, 160.0);
    h.mv(2, 140.0, 160.0);
    h.end(1, 400);
    h.end(2, 410);

    let tail = &h.transcript[moves_so_far..];
    assert!(tail.iter().all(|c| matches!(c, Command::Scroll { .. })));
    assert!(!tail.is_empty());
}

#[test]
fn test_pointer_is_parked_while_scrollbar_drag_is_held() {
    let mut h = Harness::new();
    h.engine.set_surface_width(400.0);

    // Thumb on the scrollbar strip, index finger wandering the surface
    h.start(1, 395.0, 80.0, 0);
    h.start(2, 100.0, 100.0, 20);
    h.mv(2, 115.0, 100.0);
    h.mv(2, 130.0, 100.0);
    h.mv(1, 395.0, 90.0);
    h.tick(600);
    h.end(2, 700);
    h.end(1, 750);

    // Only the drag speaks: ten px of strip travel, no pointer motion, no
    // clicks from the parked contact
    assert_eq!(h.transcript, vec![Command::Scroll { dx: 0, dy: 10 }]);
}

#[test]
fn test_settings_change_applies_mid_session() {
    let mut h = Harness::new();

    h.start(1, 100.0, 100.0, 0);
    h.mv(1, 110.0, 100.0);
    let first = h.transcript[0].clone();

    // Halve the pointer speed between samples
    h.settings.pointer_speed = 2.0;
    h.mv(1, 120.0, 100.0);
    let second = h.transcript[1].clone();

    match (first, second) {
        (Command::Move { dx: a, .. }, Command::Move { dx: b, .. }) => {
            assert_eq!(a, 40.0); // 10 px × 4.0
            assert_eq!(b, 20.0); // 10 px × 2.0
        }
        other => panic!("expected two moves, got {other:?}"),
    }
}
