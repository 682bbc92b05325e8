//! User-facing gesture and pointer tunables.
//!
//! The settings record is flat and every field has a serde default, so a
//! blob persisted by an older version (or no blob at all) loads cleanly
//! with the documented fallbacks.
//!
//! The gesture engine does not own a copy: settings are passed by reference
//! into every engine operation, so a change made mid-gesture takes effect on
//! the very next motion sample.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Flat record of pointer, gesture, and text-entry tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TouchSettings {
    /// Multiplier applied to accelerated move deltas.
    #[serde(default = "default_pointer_speed")]
    pub pointer_speed: f64,
    /// Euclidean distance in px from the gesture start before a contact
    /// counts as moving (and a tap is ruled out).
    #[serde(default = "default_move_threshold")]
    pub move_threshold: f64,
    /// Hold duration in ms before a stationary contact fires a right click.
    #[serde(default = "default_right_click_delay_ms")]
    pub right_click_delay_ms: u64,
    /// Motion-curve exponent; 1.0 is linear.
    #[serde(default = "default_acceleration")]
    pub acceleration: f64,
    /// Max gap in ms between a tap release and the next press for the press
    /// to start a drag instead of a new tap.
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
    /// Multiplier on two-finger and scrollbar-drag scroll deltas.
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f64,
    /// Horizontal px a two-finger swipe must accumulate before the
    /// navigation shortcut fires.
    #[serde(default = "default_navigation_distance")]
    pub navigation_distance: f64,
    /// Flips the direction of the navigation swipe shortcut.
    #[serde(default)]
    pub navigation_swipe_inverted: bool,
    /// Hit-width in px of the scrollbar strip along the surface's trailing
    /// edge.
    #[serde(default = "default_scrollbar_width")]
    pub scrollbar_width: f64,
    /// When set, text sends use clipboard + Ctrl+Shift+V (terminal paste)
    /// instead of the `typeAll` command.
    #[serde(default)]
    pub terminal_paste_mode: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_pointer_speed() -> f64 {
    4.0
}
fn default_move_threshold() -> f64 {
    5.0
}
fn default_right_click_delay_ms() -> u64 {
    500
}
fn default_acceleration() -> f64 {
    1.0
}
fn default_double_tap_window_ms() -> u64 {
    300
}
fn default_scroll_speed() -> f64 {
    1.0
}
fn default_navigation_distance() -> f64 {
    100.0
}
fn default_scrollbar_width() -> f64 {
    24.0
}

impl Default for TouchSettings {
    fn default() -> Self {
        Self {
            pointer_speed: default_pointer_speed(),
            move_threshold: default_move_threshold(),
            right_click_delay_ms: default_right_click_delay_ms(),
            acceleration: default_acceleration(),
            double_tap_window_ms: default_double_tap_window_ms(),
            scroll_speed: default_scroll_speed(),
            navigation_distance: default_navigation_distance(),
            navigation_swipe_inverted: false,
            scrollbar_width: default_scrollbar_width(),
            terminal_paste_mode: false,
        }
    }
}

impl TouchSettings {
    /// The deferred right-click hold duration as a [`Duration`].
    pub fn right_click_delay(&self) -> Duration {
        Duration::from_millis(self.right_click_delay_ms)
    }

    /// The double-tap window as a [`Duration`].
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
