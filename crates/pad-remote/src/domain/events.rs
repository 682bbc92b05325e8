//! Contact event traces.
//!
//! The remote's input loop is driven by contact lifecycle events.  On a
//! real handheld these come from the touch surface; for development and for
//! the replay driver they are read as JSON lines, one event per line, with
//! timestamps in milliseconds relative to the start of the trace:
//!
//! ```text
//! {"event":"surface","width":1080.0,"tMs":0}
//! {"event":"start","id":1,"x":200.0,"y":300.0,"tMs":12}
//! {"event":"move","id":1,"x":214.0,"y":301.0,"tMs":28}
//! {"event":"end","id":1,"tMs":95}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One contact lifecycle event with a trace-relative timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
pub enum ContactEvent {
    /// The touch surface reported its geometry.
    Surface { width: f64, t_ms: u64 },
    /// A new contact touched down.
    Start { id: u64, x: f64, y: f64, t_ms: u64 },
    /// A live contact moved.
    Move { id: u64, x: f64, y: f64, t_ms: u64 },
    /// A contact lifted.
    End { id: u64, t_ms: u64 },
}

impl ContactEvent {
    /// Trace-relative timestamp of the event in milliseconds.
    pub fn t_ms(&self) -> u64 {
        match self {
            Self::Surface { t_ms, .. }
            | Self::Start { t_ms, .. }
            | Self::Move { t_ms, .. }
            | Self::End { t_ms, .. } => *t_ms,
        }
    }
}

/// Error type for trace parsing.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("invalid contact event on line {line}: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses one trace line.  `line` is the 1-based line number for errors.
///
/// # Errors
///
/// Returns [`TraceError::InvalidEvent`] when the line is not a valid contact
/// event object.
pub fn parse_trace_line(text: &str, line: usize) -> Result<ContactEvent, TraceError> {
    serde_json::from_str(text).map_err(|source| TraceError::InvalidEvent { line, source })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_event_parses_from_documented_shape() {
        let event = parse_trace_line(r#"{"event":"start","id":1,"x":200.0,"y":300.0,"tMs":12}"#, 1)
            .expect("parse");
        assert_eq!(
            event,
            ContactEvent::Start {
                id: 1,
                x: 200.0,
                y: 300.0,
                t_ms: 12
            }
        );
    }

    #[test]
    fn test_end_event_carries_only_id_and_timestamp() {
        let event =
            parse_trace_line(r#"{"event":"end","id":3,"tMs":95}"#, 4).expect("parse");
        assert_eq!(event, ContactEvent::End { id: 3, t_ms: 95 });
        assert_eq!(event.t_ms(), 95);
    }

    #[test]
    fn test_surface_event_round_trips() {
        let event = ContactEvent::Surface {
            width: 1080.0,
            t_ms: 0,
        };
        let line = serde_json::to_string(&event).expect("serialize");
        assert_eq!(parse_trace_line(&line, 1).expect("parse"), event);
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let err = parse_trace_line("not json", 7).expect_err("must fail");
        let TraceError::InvalidEvent { line, .. } = err;
        assert_eq!(line, 7);
    }
}
