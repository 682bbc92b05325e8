//! Logging stand-in for OS input injection.
//!
//! Actual OS automation lives behind the [`InputInjector`] seam and ships
//! separately per platform.  This implementation logs every operation at
//! info level instead of performing it, which makes the host runnable end
//! to end (remote, channel, dispatch) on any machine and doubles as a dry
//! run mode for debugging gesture traces.

use tracing::info;

use crate::application::dispatch::{InjectionError, InputInjector};

/// Injector that narrates instead of injecting.
#[derive(Debug, Default)]
pub struct LoggingInjector;

impl LoggingInjector {
    pub fn new() -> Self {
        Self
    }
}

impl InputInjector for LoggingInjector {
    fn move_pointer(&self, dx: f64, dy: f64) -> Result<(), InjectionError> {
        info!("move pointer by ({dx:.1}, {dy:.1})");
        Ok(())
    }

    fn left_click(&self) -> Result<(), InjectionError> {
        info!("left click");
        Ok(())
    }

    fn right_click(&self) -> Result<(), InjectionError> {
        info!("right click");
        Ok(())
    }

    fn button_down(&self) -> Result<(), InjectionError> {
        info!("button down");
        Ok(())
    }

    fn button_up(&self) -> Result<(), InjectionError> {
        info!("button up");
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        info!("scroll by ({dx}, {dy})");
        Ok(())
    }

    fn key_chord(&self, keys: &[String]) -> Result<(), InjectionError> {
        info!("key chord {}", keys.join("+"));
        Ok(())
    }

    fn type_text(&self, text: &str) -> Result<(), InjectionError> {
        info!("type {} chars", text.chars().count());
        Ok(())
    }

    fn set_clipboard(&self, text: &str) -> Result<(), InjectionError> {
        info!("clipboard set to {} chars", text.chars().count());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_succeeds() {
        let injector = LoggingInjector::new();
        assert!(injector.move_pointer(1.0, 2.0).is_ok());
        assert!(injector.left_click().is_ok());
        assert!(injector.right_click().is_ok());
        assert!(injector.button_down().is_ok());
        assert!(injector.button_up().is_ok());
        assert!(injector.scroll(0, 3).is_ok());
        assert!(injector.key_chord(&["alt".into(), "left".into()]).is_ok());
        assert!(injector.type_text("hello").is_ok());
        assert!(injector.set_clipboard("hello").is_ok());
    }
}
