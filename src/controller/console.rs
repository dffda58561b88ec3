//! Operator console output
//!
//! Renders and notices from every thread go through one locked `Console`,
//! so a notice raised by the poller never lands in the middle of a render.

use crate::api::Notifier;
use crate::config::PageTheme;
use crate::controller::admin_view::{AdminView, Tone};
use parking_lot::Mutex;
use ratatui::crossterm::style::{Color, Stylize};
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

/// Console shared between the controller and the notifier
pub type SharedConsole = Arc<Mutex<Console>>;

/// Line-oriented operator console
pub struct Console {
    out: Box<dyn Write + Send>,
}

impl Console {
    /// Console writing to `out`
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    /// Console writing to standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Wrap for sharing across threads
    pub fn shared(self) -> SharedConsole {
        Arc::new(Mutex::new(self))
    }

    /// Print a plain line
    pub fn line(&mut self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    /// Print an operator notice
    pub fn notice(&mut self, message: &str) {
        let banner = format!("*** {message}").bold();
        self.write(&format!("\n{banner}\n"));
    }

    /// Print the full admin view
    pub fn render(&mut self, view: &AdminView) {
        let (fg, bg) = match view.page_theme {
            PageTheme::Light => (Color::Black, Color::White),
            PageTheme::Dark => (Color::Grey, Color::Black),
        };

        let mut frame = String::from("\n");
        for line in view.lines() {
            let color = match line.tone {
                Tone::Normal | Tone::Heading => fg,
                Tone::Warning => Color::DarkYellow,
                Tone::Expired | Tone::Error => Color::Red,
                Tone::Success => Color::DarkGreen,
                Tone::Muted => Color::DarkGrey,
            };
            let styled = line.text.as_str().with(color).on(bg);
            let styled = if line.tone == Tone::Heading {
                styled.bold()
            } else {
                styled
            };
            frame.push_str(&format!("{styled}\n"));
        }
        frame.push_str("> ");
        self.write(&frame);
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!("Console write failed: {e}");
        }
    }
}

/// `Notifier` that prints notices on the shared console
pub struct ConsoleNotifier {
    console: SharedConsole,
}

impl ConsoleNotifier {
    /// Notifier printing on `console`
    pub fn new(console: SharedConsole) -> Self {
        Self { console }
    }
}

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        self.console.lock().notice(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SharedBuffer;

    #[test]
    fn test_notifier_writes_through_console() {
        let buffer = SharedBuffer::default();
        let console = Console::new(Box::new(buffer.clone())).shared();
        let notifier = ConsoleNotifier::new(Arc::clone(&console));

        notifier.alert("Network error or API call failed for /api/theme. See the log for details.");

        assert!(buffer.contents().contains("*** Network error or API call failed for /api/theme"));
    }

    #[test]
    fn test_render_includes_view_lines() {
        let buffer = SharedBuffer::default();
        let mut console = Console::new(Box::new(buffer.clone()));
        console.render(&AdminView::default());

        let text = buffer.contents();
        assert!(text.contains("Timer 1"));
        assert!(text.ends_with("> "));
    }
}
