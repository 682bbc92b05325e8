//! The remote session: gesture input and direct user actions in, commands
//! out through a [`CommandSink`].
//!
//! The session is the application-layer hub of the remote.  It owns the
//! gesture engine and the live settings, translates contact events into
//! engine calls, and exposes the direct operations the remote UI offers
//! outside of gestures: sending text, copying text to the host clipboard,
//! firing a keyboard shortcut, and the manual drag-lock toggle.
//!
//! It does not know what a WebSocket is.  Commands leave through the
//! [`CommandSink`] seam, which the infrastructure layer implements with the
//! real channel and tests implement with a recording double.

use std::time::{Duration, Instant};

use tracing::debug;

use pad_core::{Command, GestureEngine, TouchSettings};

use crate::domain::events::ContactEvent;

/// Outbound seam for commands produced by the session.
///
/// Implementations are fire-and-forget: a sink with nowhere to put the
/// command (channel not open) drops it rather than blocking or queueing.
pub trait CommandSink {
    fn send(&self, command: Command);
}

/// Application state for one remote session.
pub struct RemoteSession<S: CommandSink> {
    engine: GestureEngine,
    settings: TouchSettings,
    sink: S,
    /// The instant trace timestamp 0 maps to.
    epoch: Instant,
    /// Manual drag-lock toggle state (the UI's "hold button"), independent
    /// of the double-tap drag the engine manages itself.
    manual_drag_lock: bool,
}

impl<S: CommandSink> RemoteSession<S> {
    pub fn new(sink: S, settings: TouchSettings) -> Self {
        Self {
            engine: GestureEngine::new(),
            settings,
            sink,
            epoch: Instant::now(),
            manual_drag_lock: false,
        }
    }

    pub fn settings(&self) -> &TouchSettings {
        &self.settings
    }

    /// Replaces the live settings.  Takes effect on the next sample; the
    /// caller is responsible for persisting the new record.
    pub fn update_settings(&mut self, settings: TouchSettings) {
        debug!("settings updated");
        self.settings = settings;
    }

    /// Feeds one contact event into the gesture engine and forwards whatever
    /// commands it produces.
    pub fn handle_event(&mut self, event: &ContactEvent) {
        let now = self.instant_at(event.t_ms());
        let commands = match *event {
            ContactEvent::Surface { width, .. } => {
                self.engine.set_surface_width(width);
                Vec::new()
            }
            ContactEvent::Start { id, x, y, .. } => {
                self.engine.on_contact_start(id, x, y, now, &self.settings)
            }
            ContactEvent::Move { id, x, y, .. } => {
                self.engine.on_contact_move(id, x, y, &self.settings)
            }
            ContactEvent::End { id, .. } => self.engine.on_contact_end(id, now),
        };
        self.forward(commands);
    }

    /// Polls the engine's time-based outcomes at trace time `t_ms`.
    pub fn tick(&mut self, t_ms: u64) {
        let now = self.instant_at(t_ms);
        let commands = self.engine.on_tick(now);
        self.forward(commands);
    }

    /// Sends `text` to the host.
    ///
    /// In the default mode this is a single `typeAll`.  In terminal paste
    /// mode the text goes through the host clipboard followed by the
    /// terminal paste chord, because terminals ignore plain Ctrl+V.
    pub fn send_text(&mut self, text: &str) {
        if self.settings.terminal_paste_mode {
            self.sink.send(Command::Copy {
                text: text.to_owned(),
            });
            self.sink.send(Command::Shortcut {
                keys: vec!["ctrl".to_owned(), "shift".to_owned(), "v".to_owned()],
            });
        } else {
            self.sink.send(Command::TypeAll {
                text: text.to_owned(),
            });
        }
    }

    /// Places `text` on the host clipboard without typing it.
    pub fn copy_text(&mut self, text: &str) {
        self.sink.send(Command::Copy {
            text: text.to_owned(),
        });
    }

    /// Fires a keyboard shortcut on the host.
    pub fn send_shortcut(&mut self, keys: Vec<String>) {
        self.sink.send(Command::Shortcut { keys });
    }

    /// Toggles the manual drag lock.  Enabling presses the button down on
    /// the host, disabling releases it; redundant toggles are no-ops.
    pub fn set_drag_lock(&mut self, enabled: bool) {
        if self.manual_drag_lock == enabled {
            return;
        }
        self.manual_drag_lock = enabled;
        let command = if enabled {
            Command::MouseDown
        } else {
            Command::MouseUp
        };
        self.sink.send(command);
    }

    pub fn drag_lock(&self) -> bool {
        self.manual_drag_lock
    }

    fn instant_at(&self, t_ms: u64) -> Instant {
        self.epoch + Duration::from_millis(t_ms)
    }

    fn forward(&self, commands: Vec<Command>) {
        for command in commands {
            self.sink.send(command);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every command instead of sending it anywhere.
    struct RecordingSink {
        sent: RefCell<Vec<Command>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandSink for RecordingSink {
        fn send(&self, command: Command) {
            self.sent.borrow_mut().push(command);
        }
    }

    fn session() -> RemoteSession<RecordingSink> {
        RemoteSession::new(RecordingSink::new(), TouchSettings::default())
    }

    fn sent(session: &RemoteSession<RecordingSink>) -> Vec<Command> {
        session.sink.sent.borrow().clone()
    }

    #[test]
    fn test_tap_trace_reaches_the_sink_as_left_click() {
        let mut s = session();

        s.handle_event(&ContactEvent::Start {
            id: 1,
            x: 100.0,
            y: 100.0,
            t_ms: 0,
        });
        s.tick(50);
        s.handle_event(&ContactEvent::End { id: 1, t_ms: 90 });

        assert_eq!(sent(&s), vec![Command::LeftClick]);
    }

    #[test]
    fn test_hold_trace_fires_right_click_through_ticks() {
        let mut s = session();

        s.handle_event(&ContactEvent::Start {
            id: 1,
            x: 100.0,
            y: 100.0,
            t_ms: 0,
        });
        for t in (0..700).step_by(50) {
            s.tick(t);
        }
        s.handle_event(&ContactEvent::End { id: 1, t_ms: 700 });

        assert_eq!(sent(&s), vec![Command::RightClick]);
    }

    #[test]
    fn test_surface_event_repositions_the_scrollbar_strip() {
        let mut s = session();
        s.handle_event(&ContactEvent::Surface {
            width: 400.0,
            t_ms: 0,
        });

        // x = 390 is in the strip for a 400 px wide surface
        s.handle_event(&ContactEvent::Start {
            id: 1,
            x: 390.0,
            y: 100.0,
            t_ms: 10,
        });
        s.handle_event(&ContactEvent::Move {
            id: 1,
            x: 390.0,
            y: 104.0,
            t_ms: 30,
        });

        assert_eq!(sent(&s), vec![Command::Scroll { dx: 0, dy: 4 }]);
    }

    #[test]
    fn test_send_text_defaults_to_type_all() {
        let mut s = session();
        s.send_text("hello world");
        assert_eq!(
            sent(&s),
            vec![Command::TypeAll {
                text: "hello world".to_owned()
            }]
        );
    }

    #[test]
    fn test_send_text_in_terminal_mode_uses_clipboard_and_paste_chord() {
        let mut s = session();
        let mut settings = TouchSettings::default();
        settings.terminal_paste_mode = true;
        s.update_settings(settings);

        s.send_text("ls -la");

        assert_eq!(
            sent(&s),
            vec![
                Command::Copy {
                    text: "ls -la".to_owned()
                },
                Command::Shortcut {
                    keys: vec!["ctrl".to_owned(), "shift".to_owned(), "v".to_owned()]
                },
            ]
        );
    }

    #[test]
    fn test_copy_text_never_types() {
        let mut s = session();
        s.copy_text("secret");
        assert_eq!(
            sent(&s),
            vec![Command::Copy {
                text: "secret".to_owned()
            }]
        );
    }

    #[test]
    fn test_drag_lock_toggle_brackets_down_and_up() {
        let mut s = session();

        s.set_drag_lock(true);
        s.set_drag_lock(true); // redundant: no second mouseDown
        s.set_drag_lock(false);

        assert_eq!(sent(&s), vec![Command::MouseDown, Command::MouseUp]);
    }

    #[test]
    fn test_settings_update_changes_gesture_behavior() {
        let mut s = session();
        let mut settings = TouchSettings::default();
        settings.pointer_speed = 1.0;
        s.update_settings(settings);

        s.handle_event(&ContactEvent::Start {
            id: 1,
            x: 0.0,
            y: 0.0,
            t_ms: 0,
        });
        s.handle_event(&ContactEvent::Move {
            id: 1,
            x: 10.0,
            y: 0.0,
            t_ms: 20,
        });

        assert_eq!(sent(&s), vec![Command::Move { dx: 10.0, dy: 0.0 }]);
    }
}
