//! Gesture recognition: raw contact events in, abstract commands out.
//!
//! Everything in this module is pure and single-threaded.  There are no
//! timers and no wall-clock reads: every operation takes the current time as
//! an explicit `Instant`, and the deferred right-click "timer" is a deadline
//! polled through [`engine::GestureEngine::on_tick`].  Tests simulate
//! elapsed time by offsetting a base instant instead of sleeping.

pub mod engine;
pub mod multi_touch;
pub mod quantizer;
pub mod single_touch;
pub mod tracker;
