//! Top-level gesture engine.
//!
//! The engine consumes raw contact lifecycle events (start, move, end) plus a
//! periodic tick and produces abstract input commands.  It owns the contact
//! tracker and at most one active gesture of each family:
//!
//! - one [`SinglePointerGesture`] while exactly one ordinary contact is down
//!   and no scrollbar drag is held,
//! - one [`TwoFingerGesture`] while exactly two are down,
//! - one scrollbar drag while a contact that started in the trailing-edge
//!   strip is held.
//!
//! Transitions are strict.  A second press silently tears down the single
//! gesture and starts a two-finger one; a third press tears down the
//! two-finger gesture and nothing replaces it.  When a two-finger gesture
//! ends because one contact lifted, the surviving contact is inert until it
//! lifts too.  Teardown never emits synthetic releases or clicks.

use std::time::Instant;

use tracing::trace;

use crate::domain::settings::TouchSettings;
use crate::gesture::multi_touch::TwoFingerGesture;
use crate::gesture::quantizer::ScrollQuantizer;
use crate::gesture::single_touch::SinglePointerGesture;
use crate::gesture::tracker::{ContactId, ContactRole, ContactTracker};
use crate::protocol::commands::Command;

/// Fallback surface width before the first geometry report.
const DEFAULT_SURFACE_WIDTH: f64 = 1080.0;

/// Contact events in, commands out.
#[derive(Debug)]
pub struct GestureEngine {
    tracker: ContactTracker,
    single: Option<SinglePointerGesture>,
    two_finger: Option<TwoFingerGesture>,
    scrollbar_quantizer: ScrollQuantizer,
    scrollbar_last_y: Option<f64>,
    /// Release instant of the most recent plain tap; opens the double-tap
    /// drag window for the next press.
    last_tap_release: Option<Instant>,
    surface_width: f64,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureEngine {
    pub fn new() -> Self {
        Self {
            tracker: ContactTracker::new(),
            single: None,
            two_finger: None,
            scrollbar_quantizer: ScrollQuantizer::new(),
            scrollbar_last_y: None,
            last_tap_release: None,
            surface_width: DEFAULT_SURFACE_WIDTH,
        }
    }

    /// Updates the touch surface width used for the scrollbar hit test.
    /// Called when the surface reports its geometry or is resized.
    pub fn set_surface_width(&mut self, width: f64) {
        self.surface_width = width;
    }

    /// Handles a new contact at `(x, y)`.
    pub fn on_contact_start(
        &mut self,
        id: ContactId,
        x: f64,
        y: f64,
        now: Instant,
        settings: &TouchSettings,
    ) -> Vec<Command> {
        // A press inside the trailing-edge strip becomes a scrollbar drag,
        // unless one is already held.
        let in_strip = x >= self.surface_width - settings.scrollbar_width;
        if in_strip && !self.tracker.scrollbar_active() {
            self.tracker.insert(id, x, y, ContactRole::ScrollbarDrag);
            self.scrollbar_last_y = Some(y);
            // The scrollbar takes over: any pointer gesture in progress is
            // torn down without emitting.
            self.single = None;
            return Vec::new();
        }

        self.tracker.insert(id, x, y, ContactRole::Normal);
        match self.tracker.ordinary_count() {
            1 => {
                // No pointer gesture while a scrollbar drag holds the
                // surface; a contact pressed mid-drag stays inert until
                // it lifts.
                if self.tracker.scrollbar_active() {
                    trace!("ordinary contact during scrollbar drag, staying inert");
                    return Vec::new();
                }
                let (gesture, down) =
                    SinglePointerGesture::begin(x, y, now, self.last_tap_release, settings);
                self.single = Some(gesture);
                down.into_iter().collect()
            }
            2 => {
                trace!("second contact, starting two-finger gesture");
                self.single = None;
                let (cx, cy) = self.ordinary_centroid();
                self.two_finger = Some(TwoFingerGesture::begin(cx, cy));
                Vec::new()
            }
            n => {
                // Three or more: all pointer interpretation stops until the
                // extra contacts clear and a fresh gesture begins.
                trace!("{n} contacts, suspending gesture interpretation");
                self.single = None;
                self.two_finger = None;
                Vec::new()
            }
        }
    }

    /// Handles a position update for a live contact.  Events for unknown ids
    /// are dropped.
    pub fn on_contact_move(
        &mut self,
        id: ContactId,
        x: f64,
        y: f64,
        settings: &TouchSettings,
    ) -> Vec<Command> {
        let Some(role) = self.tracker.update_position(id, x, y) else {
            return Vec::new();
        };

        match role {
            ContactRole::ScrollbarDrag => self.on_scrollbar_move(y, settings),
            ContactRole::Normal => {
                if self.two_finger.is_some() {
                    let (cx, cy) = self.ordinary_centroid();
                    if let Some(two) = self.two_finger.as_mut() {
                        return two.on_center_move(cx, cy, settings).into_iter().collect();
                    }
                    Vec::new()
                } else if let Some(single) = self.single.as_mut() {
                    single.on_move(x, y, settings).into_iter().collect()
                } else {
                    // Surviving remnant of a torn-down gesture: inert.
                    Vec::new()
                }
            }
        }
    }

    /// Handles a contact lifting.  Events for unknown ids are dropped.
    pub fn on_contact_end(&mut self, id: ContactId, now: Instant) -> Vec<Command> {
        let Some(removed) = self.tracker.remove(id) else {
            return Vec::new();
        };

        match removed.role {
            ContactRole::ScrollbarDrag => {
                self.scrollbar_quantizer.reset();
                self.scrollbar_last_y = None;
                Vec::new()
            }
            ContactRole::Normal => {
                if let Some(two) = self.two_finger.take() {
                    return two.finish().into_iter().collect();
                }
                if let Some(single) = self.single.take() {
                    if single.is_candidate_tap() {
                        self.last_tap_release = Some(now);
                    }
                    return single.finish().into_iter().collect();
                }
                Vec::new()
            }
        }
    }

    /// Polls time-based gesture outcomes, currently the deferred right
    /// click.  Intended to be called at a steady cadence (tens of ms).
    pub fn on_tick(&mut self, now: Instant) -> Vec<Command> {
        match self.single.as_mut() {
            Some(single) => single.on_tick(now).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn on_scrollbar_move(&mut self, y: f64, settings: &TouchSettings) -> Vec<Command> {
        let Some(last_y) = self.scrollbar_last_y.replace(y) else {
            return Vec::new();
        };
        let delta = (y - last_y) * settings.scroll_speed;
        match self.scrollbar_quantizer.feed(delta) {
            Some(units) => vec![Command::Scroll { dx: 0, dy: units }],
            None => Vec::new(),
        }
    }

    fn ordinary_centroid(&self) -> (f64, f64) {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut n = 0usize;
        for c in self.tracker.ordinary_contacts() {
            sum_x += c.x;
            sum_y += c.y;
            n += 1;
        }
        if n == 0 {
            (0.0, 0.0)
        } else {
            (sum_x / n as f64, sum_y / n as f64)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
