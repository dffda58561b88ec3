//! Admin console view model
//!
//! `AdminView` holds everything the operator sees. Only `AdminController`
//! writes it; local edits are provisional until the next accepted poll.

use crate::api::{Logo, StatusSnapshot, ThemeForm, TimerId, TimerState};
use crate::config::PageTheme;
use crate::viewer::format::{format_admin_time, is_admin_warning};
use crate::viewer::scene::TIMES_UP_TEXT;
use std::time::Instant;

/// Label shown for a disabled timer
pub const DISABLED_TEXT: &str = "Disabled";

/// Colour role of a console line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    /// Regular text
    #[default]
    Normal,
    /// Section heading
    Heading,
    /// Running timer close to zero
    Warning,
    /// Expired timer
    Expired,
    /// Inactive item
    Muted,
    /// Completed operation
    Success,
    /// Failed operation
    Error,
}

/// One rendered console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    /// Line text
    pub text: String,
    /// Colour role
    pub tone: Tone,
}

impl ViewLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Per-timer controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerControls {
    /// Timer these controls drive
    pub id: TimerId,
    /// Remaining time, `Disabled` or `TIMES UP`
    pub display: String,
    /// Display colour role
    pub tone: Tone,
    /// Enable toggle
    pub enabled: bool,
    /// Logo dropdown selection
    pub logo_selection: Option<String>,
}

impl TimerControls {
    fn new(id: TimerId) -> Self {
        Self {
            id,
            display: DISABLED_TEXT.to_string(),
            tone: Tone::Muted,
            enabled: false,
            logo_selection: None,
        }
    }

    /// Overwrite from the service's state
    pub fn apply(&mut self, state: &TimerState) {
        let remaining = state.remaining_clamped();
        (self.display, self.tone) = if !state.enabled {
            (DISABLED_TEXT.to_string(), Tone::Muted)
        } else if state.times_up {
            (TIMES_UP_TEXT.to_string(), Tone::Expired)
        } else if is_admin_warning(remaining, state.is_running) {
            (format_admin_time(remaining), Tone::Warning)
        } else {
            (format_admin_time(remaining), Tone::Normal)
        };
        self.enabled = state.enabled;
        self.logo_selection = state.logo().map(str::to_string);
    }
}

/// Inline status of the PIN dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Message text
    pub text: String,
    /// Colour role
    pub tone: Tone,
}

/// PIN change dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinDialog {
    /// Whether the dialog is shown
    pub open: bool,
    /// Latest inline status
    pub status: Option<StatusLine>,
    /// When a successful change closes the dialog
    pub dismiss_at: Option<Instant>,
}

impl PinDialog {
    /// Open the dialog with `text` as its status
    pub fn show(&mut self, text: impl Into<String>, tone: Tone) {
        self.open = true;
        self.status = Some(StatusLine {
            text: text.into(),
            tone,
        });
    }

    /// Close and clear the dialog
    pub fn close(&mut self) {
        *self = Self::default();
    }
}

/// Everything shown on the operator console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminView {
    /// Console light/dark preference
    pub page_theme: PageTheme,
    /// Controls indexed by `TimerId::index`
    pub timers: [TimerControls; 2],
    /// Uploaded logos in service order
    pub logos: Vec<Logo>,
    /// PIN change dialog
    pub pin_dialog: PinDialog,
    /// Viewer theme form
    pub theme_form: ThemeForm,
    /// Logo awaiting delete confirmation
    pub pending_delete: Option<Logo>,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            page_theme: PageTheme::default(),
            timers: TimerId::ALL.map(TimerControls::new),
            logos: Vec::new(),
            pin_dialog: PinDialog::default(),
            theme_form: ThemeForm::default(),
            pending_delete: None,
        }
    }
}

impl AdminView {
    /// Controls for `id`
    pub fn timer(&self, id: TimerId) -> &TimerControls {
        &self.timers[id.index()]
    }

    /// Mutable controls for `id`
    pub fn timer_mut(&mut self, id: TimerId) -> &mut TimerControls {
        &mut self.timers[id.index()]
    }

    /// Apply an accepted status snapshot
    ///
    /// Only timers present in the snapshot are touched.
    pub fn apply_status(&mut self, snapshot: &StatusSnapshot) {
        for (id, state) in &snapshot.timers {
            self.timer_mut(*id).apply(state);
        }
    }

    /// Replace the logo list and prune selections that no longer exist
    pub fn render_logo_list(&mut self, logos: Vec<Logo>) {
        for controls in &mut self.timers {
            let still_exists = controls
                .logo_selection
                .as_deref()
                .is_some_and(|selected| logos.iter().any(|logo| logo.filename == selected));
            if !still_exists {
                controls.logo_selection = None;
            }
        }
        self.logos = logos;
    }

    /// Display name of the logo stored as `filename`
    pub fn logo_name(&self, filename: &str) -> Option<&str> {
        self.logos
            .iter()
            .find(|logo| logo.filename == filename)
            .map(|logo| logo.name.as_str())
    }

    /// Lines of the console view, top to bottom
    pub fn lines(&self) -> Vec<ViewLine> {
        let mut lines = vec![ViewLine::new("== Stage Timer Admin ==", Tone::Heading)];

        for controls in &self.timers {
            let logo = controls
                .logo_selection
                .as_deref()
                .map_or_else(|| "(none)".to_string(), |f| self.logo_label(f));
            let toggle = if controls.enabled { "on " } else { "off" };
            lines.push(ViewLine::new(
                format!(
                    "Timer {}: {:<10} [{toggle}]  logo: {logo}",
                    controls.id, controls.display
                ),
                controls.tone,
            ));
        }

        if self.logos.is_empty() {
            lines.push(ViewLine::new("Logos: (none uploaded)", Tone::Muted));
        } else {
            lines.push(ViewLine::new("Logos:", Tone::Heading));
            for logo in &self.logos {
                lines.push(ViewLine::new(
                    format!("  {} ({})", logo.name, logo.filename),
                    Tone::Normal,
                ));
            }
        }

        let form = &self.theme_form;
        lines.push(ViewLine::new(
            format!(
                "Viewer theme: background {}, font {}, low time {} min, warning {}",
                form.background,
                form.font_color,
                form.low_time_minutes,
                if form.warning_enabled { "on" } else { "off" }
            ),
            Tone::Normal,
        ));

        if self.pin_dialog.open {
            let (text, tone) = self
                .pin_dialog
                .status
                .as_ref()
                .map_or(("", Tone::Normal), |s| (s.text.as_str(), s.tone));
            lines.push(ViewLine::new(format!("[Change PIN] {text}"), tone));
        }

        if let Some(logo) = &self.pending_delete {
            lines.push(ViewLine::new(
                format!(
                    "Are you sure you want to delete logo \"{}\"? (yes/no)",
                    logo.name
                ),
                Tone::Warning,
            ));
        }

        lines
    }

    fn logo_label(&self, filename: &str) -> String {
        match self.logo_name(filename) {
            Some(name) => format!("{name} ({filename})"),
            None => filename.to_string(),
        }
    }
}
