//! Continuous-to-discrete scroll conversion.
//!
//! Scroll motion arrives as fractional pixel deltas but the wire protocol
//! carries integer scroll units.  Naive truncation per sample would lose the
//! fraction every time and systematically under-scroll; the quantizer keeps
//! the remainder so the emitted integers sum to the true total.

/// Accumulates fractional scroll distance and emits whole units.
///
/// The two-finger gesture and the scrollbar drag each own an independent
/// instance; the accumulator resets when its owning gesture ends.
#[derive(Debug, Default)]
pub struct ScrollQuantizer {
    accumulator: f64,
}

/// Minimum absolute accumulated distance before units are emitted.
const EMIT_THRESHOLD: f64 = 1.0;

impl ScrollQuantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` and returns whole scroll units when at least one is due.
    ///
    /// The emitted integer is subtracted exactly, so the fractional remainder
    /// carries into the next call and long sequences do not drift.
    pub fn feed(&mut self, delta: f64) -> Option<i32> {
        self.accumulator += delta;
        if self.accumulator.abs() >= EMIT_THRESHOLD {
            let units = self.accumulator.round() as i32;
            self.accumulator -= f64::from(units);
            Some(units)
        } else {
            None
        }
    }

    /// Discards any un-flushed fraction.  Called when the owning gesture ends.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
