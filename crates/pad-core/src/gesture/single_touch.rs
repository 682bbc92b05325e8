//! Single-contact gesture classification.
//!
//! One ordinary contact resolves into exactly one of four interpretations:
//!
//! - **tap** — released without moving before the right-click delay elapses,
//! - **deferred right click** — held stationary past the delay,
//! - **double-tap drag** — pressed within the double-tap window of the
//!   previous tap's release; the button is held down for the whole contact,
//! - **move** — displacement from the start exceeds the move threshold.
//!
//! Tap and deferred right click are mutually exclusive outcomes of the same
//! gesture.  The deferred right click is an explicit deadline owned by this
//! object and polled by the engine; destroying the gesture cancels it, so a
//! torn-down gesture can never fire after its successor begins.

use std::time::Instant;

use crate::domain::settings::TouchSettings;
use crate::protocol::commands::Command;

/// Transient state for the sole active ordinary contact.
#[derive(Debug)]
pub struct SinglePointerGesture {
    start_x: f64,
    start_y: f64,
    last_x: f64,
    last_y: f64,
    moving: bool,
    /// Set when the contact began as a double-tap drag; `mouseDown` was
    /// already emitted and `mouseUp` is owed on release.
    drag_lock: bool,
    right_click_deadline: Option<Instant>,
    right_click_fired: bool,
}

/// Applies the motion curve: `sign(d) · |d|^exponent`.  Exponent 1.0 is linear.
fn accelerate(delta: f64, exponent: f64) -> f64 {
    if delta == 0.0 {
        0.0
    } else {
        delta.signum() * delta.abs().powf(exponent)
    }
}

impl SinglePointerGesture {
    /// Starts a gesture at `(x, y)`.
    ///
    /// When `now` falls within the double-tap window of `last_tap_release`,
    /// the contact is a drag start: `mouseDown` is returned immediately and
    /// no right-click deadline is armed.  Otherwise the deadline is armed at
    /// `now + right_click_delay`.
    pub fn begin(
        x: f64,
        y: f64,
        now: Instant,
        last_tap_release: Option<Instant>,
        settings: &TouchSettings,
    ) -> (Self, Option<Command>) {
        let is_double_tap = last_tap_release
            .map(|released| now.duration_since(released) < settings.double_tap_window())
            .unwrap_or(false);

        let gesture = Self {
            start_x: x,
            start_y: y,
            last_x: x,
            last_y: y,
            // A drag-locked contact never resolves to a click on release.
            moving: is_double_tap,
            drag_lock: is_double_tap,
            right_click_deadline: if is_double_tap {
                None
            } else {
                Some(now + settings.right_click_delay())
            },
            right_click_fired: false,
        };

        let command = is_double_tap.then_some(Command::MouseDown);
        (gesture, command)
    }

    /// Processes one motion sample.
    ///
    /// Emits a `move` command once the displacement from the start position
    /// exceeds the move threshold; crossing the threshold also cancels the
    /// pending right-click deadline (the contact is no longer a candidate
    /// tap or hold).
    pub fn on_move(&mut self, x: f64, y: f64, settings: &TouchSettings) -> Option<Command> {
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        let from_start = ((x - self.start_x).powi(2) + (y - self.start_y).powi(2)).sqrt();
        self.last_x = x;
        self.last_y = y;

        if from_start <= settings.move_threshold {
            return None;
        }

        self.moving = true;
        if !self.drag_lock {
            self.right_click_deadline = None;
        }

        Some(Command::Move {
            dx: accelerate(dx, settings.acceleration) * settings.pointer_speed,
            dy: accelerate(dy, settings.acceleration) * settings.pointer_speed,
        })
    }

    /// Polls the deferred right-click deadline.
    ///
    /// Fires at most once per gesture; after firing, the eventual release
    /// emits nothing (the right click already consumed the gesture).
    pub fn on_tick(&mut self, now: Instant) -> Option<Command> {
        let deadline = self.right_click_deadline?;
        if now < deadline {
            return None;
        }
        self.right_click_deadline = None;
        if self.moving {
            return None;
        }
        self.right_click_fired = true;
        self.moving = true;
        Some(Command::RightClick)
    }

    /// Ends the gesture on contact release.
    ///
    /// Consumes the gesture: a drag lock resolves to `mouseUp`, an unmoved
    /// un-fired contact resolves to `leftClick`, anything else to nothing.
    /// The pending deadline, if any, dies with the object.
    pub fn finish(mut self) -> Option<Command> {
        self.right_click_deadline = None;
        if self.drag_lock {
            Some(Command::MouseUp)
        } else if !self.moving {
            Some(Command::LeftClick)
        } else {
            None
        }
    }

    /// Whether this gesture resolved (or will resolve) to a plain tap, i.e.
    /// its release should start the double-tap window.
    pub fn is_candidate_tap(&self) -> bool {
        !self.drag_lock && !self.moving && !self.right_click_fired
    }

    /// Whether the deferred right click already fired.
    pub fn right_click_fired(&self) -> bool {
        self.right_click_fired
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
