//! Two-contact gesture classification.
//!
//! Two simultaneous ordinary contacts are tracked through their centroid.
//! The gesture starts undecided: until the centroid has travelled the
//! detection distance from its starting point nothing is emitted.  At that
//! point the direction of travel decides the kind exactly once:
//!
//! - mostly **horizontal** travel is a navigation swipe that fires one
//!   Alt+arrow shortcut,
//! - mostly **vertical** travel is a scroll that streams quantized units,
//! - a release while still undecided is a two-finger tap, i.e. a right
//!   click.
//!
//! The kind never changes after classification; a swipe that hooks downward
//! after being classified as navigation stays a navigation swipe.

use std::f64::consts::FRAC_PI_4;

use crate::domain::settings::TouchSettings;
use crate::gesture::quantizer::ScrollQuantizer;
use crate::protocol::commands::Command;

/// Centroid displacement in px before the gesture kind is decided.
const DETECTION_DISTANCE: f64 = 15.0;

/// Damping applied to raw centroid deltas before scroll quantization.
const SCROLL_SMOOTHING: f64 = 0.3;

/// What a classified two-finger gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFingerKind {
    Scroll,
    Navigation,
}

/// Transient state for a pair of ordinary contacts.
#[derive(Debug)]
pub struct TwoFingerGesture {
    start_cx: f64,
    start_cy: f64,
    last_cx: f64,
    last_cy: f64,
    /// Decided once the centroid clears [`DETECTION_DISTANCE`]; never
    /// reassigned afterwards.
    kind: Option<TwoFingerKind>,
    horizontal_travel: f64,
    navigation_fired: bool,
    quantizer: ScrollQuantizer,
}

impl TwoFingerGesture {
    /// Starts an undecided gesture at the centroid of the two contacts.
    pub fn begin(cx: f64, cy: f64) -> Self {
        Self {
            start_cx: cx,
            start_cy: cy,
            last_cx: cx,
            last_cy: cy,
            kind: None,
            horizontal_travel: 0.0,
            navigation_fired: false,
            quantizer: ScrollQuantizer::new(),
        }
    }

    /// The decided kind, if classification has happened.
    pub fn kind(&self) -> Option<TwoFingerKind> {
        self.kind
    }

    /// Feeds the new centroid position.
    ///
    /// Returns a command when the sample produces one: whole scroll units for
    /// a scroll, or the one-shot Alt+arrow shortcut for a navigation swipe.
    pub fn on_center_move(
        &mut self,
        cx: f64,
        cy: f64,
        settings: &TouchSettings,
    ) -> Option<Command> {
        let mut dx = cx - self.last_cx;
        let mut dy = cy - self.last_cy;
        self.last_cx = cx;
        self.last_cy = cy;

        if self.kind.is_none() {
            let from_start_x = cx - self.start_cx;
            let from_start_y = cy - self.start_cy;
            let displacement = from_start_x.hypot(from_start_y);
            if displacement < DETECTION_DISTANCE {
                return None;
            }
            self.kind = Some(classify(from_start_x, from_start_y));
            // The travel spent on detection counts toward the first
            // classified sample, so nothing the user did is dropped.
            dx = from_start_x;
            dy = from_start_y;
        }

        match self.kind {
            Some(TwoFingerKind::Scroll) => {
                let units = self
                    .quantizer
                    .feed(dy * settings.scroll_speed * SCROLL_SMOOTHING)?;
                Some(Command::Scroll { dx: 0, dy: units })
            }
            Some(TwoFingerKind::Navigation) => {
                if self.navigation_fired {
                    return None;
                }
                self.horizontal_travel += dx;
                if self.horizontal_travel.abs() < settings.navigation_distance {
                    return None;
                }
                self.navigation_fired = true;
                let rightward = self.horizontal_travel > 0.0;
                let forward = rightward != settings.navigation_swipe_inverted;
                let arrow = if forward { "right" } else { "left" };
                Some(Command::Shortcut {
                    keys: vec!["alt".to_owned(), arrow.to_owned()],
                })
            }
            None => None,
        }
    }

    /// Ends the gesture when either contact lifts.
    ///
    /// A gesture that never reached classification was a two-finger tap and
    /// resolves to a right click; anything classified resolves to nothing.
    pub fn finish(self) -> Option<Command> {
        if self.kind.is_none() {
            Some(Command::RightClick)
        } else {
            None
        }
    }
}

/// Direction-of-travel classification at the moment of detection.
///
/// Travel within 45° of the horizontal axis (either side) is a navigation
/// swipe; everything steeper is a scroll.
fn classify(dx: f64, dy: f64) -> TwoFingerKind {
    let angle = dy.atan2(dx).abs();
    if angle <= FRAC_PI_4 || angle >= 3.0 * FRAC_PI_4 {
        TwoFingerKind::Navigation
    } else {
        TwoFingerKind::Scroll
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
