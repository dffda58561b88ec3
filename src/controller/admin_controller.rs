//! Admin controller implementation
//!
//! `AdminController` is the single writer of the `AdminView`. Operator
//! commands, status polls and clock ticks all arrive as `AdminEvent`s on one
//! channel and are handled in order on one thread.

use crate::api::{
    ApiClient, ApiOutcome, ControlAction, Logo, Notifier, ThemeForm, TimerId, is_valid_pin,
    parse_time_field,
};
use crate::config::{ClientConfig, ConfigManager};
use crate::controller::admin_view::{AdminView, Tone};
use crate::controller::command::{AdminCommand, help_text};
use crate::controller::console::SharedConsole;
use crate::error::StageTimerError;
use crate::monitor::PollEvent;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How long a successful PIN change stays on screen
pub const PIN_DIALOG_DISMISS: Duration = Duration::from_secs(2);

/// Wait between ticks when no event arrives
const EVENT_WAIT: Duration = Duration::from_millis(100);

/// Events consumed by the admin controller
#[derive(Debug)]
pub enum AdminEvent {
    /// A parsed operator command
    Command(AdminCommand),
    /// A status poll result
    Poll(PollEvent),
    /// Clock tick for deadlines
    Tick(Instant),
}

impl From<PollEvent> for AdminEvent {
    fn from(event: PollEvent) -> Self {
        Self::Poll(event)
    }
}

/// Whether the event loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep handling events
    Continue,
    /// The operator quit
    Quit,
}

/// Admin console logic controller
pub struct AdminController {
    client: Arc<ApiClient>,
    config: ClientConfig,
    config_path: PathBuf,
    console: SharedConsole,
    notifier: Arc<dyn Notifier>,
    view: AdminView,
}

impl AdminController {
    /// Create a controller; the saved page theme is applied immediately
    pub fn new(
        client: Arc<ApiClient>,
        config: ClientConfig,
        config_path: PathBuf,
        console: SharedConsole,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let view = AdminView {
            page_theme: config.preferences.page_theme,
            ..AdminView::default()
        };

        Self {
            client,
            config,
            config_path,
            console,
            notifier,
            view,
        }
    }

    /// Current view
    pub fn view(&self) -> &AdminView {
        &self.view
    }

    /// Current client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Load the theme form, logos and status, then draw the first view
    pub fn initialize(&mut self) {
        info!("Initializing admin console");
        self.load_theme();
        self.reload_logos();
        self.render();
    }

    /// Run until the operator quits or every sender is gone
    pub fn run(&mut self, events: &mpsc::Receiver<AdminEvent>) {
        use std::sync::mpsc::RecvTimeoutError;

        info!("Entering admin event loop");
        loop {
            let event = match events.recv_timeout(EVENT_WAIT) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => AdminEvent::Tick(Instant::now()),
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Admin event channel disconnected. Exiting event loop.");
                    break;
                }
            };

            if self.handle_event(event) == Flow::Quit {
                break;
            }
        }
        info!("Admin event loop exited");
    }

    /// Handle one event
    pub fn handle_event(&mut self, event: AdminEvent) -> Flow {
        match event {
            AdminEvent::Command(command) => return self.handle_command(command),
            AdminEvent::Poll(PollEvent::Snapshot(snapshot)) => {
                self.view.apply_status(&snapshot);
                self.render();
            }
            AdminEvent::Poll(PollEvent::Failed(e)) => {
                debug!("Admin status poll failed: {e}");
            }
            AdminEvent::Tick(now) => {
                if self
                    .view
                    .pin_dialog
                    .dismiss_at
                    .is_some_and(|deadline| now >= deadline)
                {
                    self.view.pin_dialog.close();
                    self.render();
                }
            }
        }
        Flow::Continue
    }

    fn handle_command(&mut self, command: AdminCommand) -> Flow {
        let pending = self.view.pending_delete.take();

        match command {
            AdminCommand::Yes => match pending {
                Some(logo) => self.delete_logo(&logo),
                None => self.notice("Nothing to confirm."),
            },
            AdminCommand::No => {
                if pending.is_some() {
                    self.notice("Delete cancelled.");
                }
            }
            AdminCommand::Quit => return Flow::Quit,
            other => {
                if let Some(logo) = pending {
                    debug!("Delete of {} cancelled by another command", logo.filename);
                }
                self.dispatch(other);
            }
        }

        self.render();
        Flow::Continue
    }

    fn dispatch(&mut self, command: AdminCommand) {
        match command {
            AdminCommand::Help => self.console.lock().line(&help_text()),
            AdminCommand::DarkMode => self.toggle_page_theme(),
            AdminCommand::Pin {
                current,
                new,
                confirm,
            } => self.change_pin(&current, &new, &confirm),
            AdminCommand::PinClose => self.view.pin_dialog.close(),
            AdminCommand::Theme => self.load_theme(),
            AdminCommand::ThemeSet {
                background,
                font_color,
                low_time_minutes,
                warning,
            } => {
                let form = &mut self.view.theme_form;
                if let Some(background) = background {
                    form.background = background;
                }
                if let Some(font_color) = font_color {
                    form.font_color = font_color;
                }
                if let Some(minutes) = low_time_minutes {
                    form.low_time_minutes = minutes;
                }
                if let Some(warning) = warning {
                    form.warning_enabled = warning;
                }
                self.submit_theme();
            }
            AdminCommand::Enable { timer } => self.set_enabled(timer, true),
            AdminCommand::Disable { timer } => self.set_enabled(timer, false),
            AdminCommand::SetTime {
                timer,
                hours,
                minutes,
                seconds,
            } => self.control(
                timer,
                &ControlAction::SetTime {
                    hours: parse_time_field(&hours),
                    minutes: parse_time_field(&minutes),
                    seconds: parse_time_field(&seconds),
                },
            ),
            AdminCommand::Start { timer } => self.control(timer, &ControlAction::Start),
            AdminCommand::Pause { timer } => self.control(timer, &ControlAction::Pause),
            AdminCommand::Resume { timer } => self.control(timer, &ControlAction::Resume),
            AdminCommand::Reset { timer } => self.control(timer, &ControlAction::Reset),
            AdminCommand::Logo { timer, filename } => {
                self.view.timer_mut(timer).logo_selection = Some(filename.clone());
                self.control(
                    timer,
                    &ControlAction::SetLogo {
                        logo_filename: Some(filename),
                    },
                );
            }
            AdminCommand::ClearLogo { timer } => {
                self.view.timer_mut(timer).logo_selection = None;
                self.control(
                    timer,
                    &ControlAction::SetLogo {
                        logo_filename: None,
                    },
                );
            }
            AdminCommand::Upload { path, name } => self.upload_logo(&path, &name.join(" ")),
            AdminCommand::Logos => self.reload_logos(),
            AdminCommand::DeleteLogo { filename } => {
                let name = self
                    .view
                    .logo_name(&filename)
                    .unwrap_or(filename.as_str())
                    .to_string();
                self.view.pending_delete = Some(Logo { name, filename });
            }
            AdminCommand::Refresh => self.refresh_status(),
            AdminCommand::Yes | AdminCommand::No | AdminCommand::Quit => {}
        }
    }

    fn toggle_page_theme(&mut self) {
        let theme = self.view.page_theme.toggled();
        self.view.page_theme = theme;
        self.config.preferences.page_theme = theme;

        if let Err(e) = ConfigManager::save_to(&self.config_path, &self.config) {
            warn!("Failed to save page theme preference: {e}");
        }
    }

    fn change_pin(&mut self, current: &str, new: &str, confirm: &str) {
        let dialog = &mut self.view.pin_dialog;
        dialog.dismiss_at = None;

        if !is_valid_pin(current) || !is_valid_pin(new) {
            dialog.show("Error: All PINs must be 5 numerical digits.", Tone::Error);
            return;
        }
        if new != confirm {
            dialog.show("Error: New PINs do not match.", Tone::Error);
            return;
        }

        dialog.show("Updating...", Tone::Normal);
        self.render();

        let outcome = self.client.change_pin(current, new);
        let dialog = &mut self.view.pin_dialog;
        if outcome.is_success() {
            info!("Admin PIN changed");
            dialog.show(outcome.field("message").unwrap_or("Success!"), Tone::Success);
            dialog.dismiss_at = Some(Instant::now() + PIN_DIALOG_DISMISS);
        } else {
            let reason = outcome
                .field("error")
                .unwrap_or("An unknown error occurred.");
            dialog.show(format!("Error: {reason}"), Tone::Error);
        }
    }

    fn load_theme(&mut self) {
        match self.client.get_theme() {
            Ok(settings) => self.view.theme_form = ThemeForm::from_settings(&settings),
            Err(e) => warn!("Failed to load viewer theme: {e}"),
        }
    }

    fn submit_theme(&mut self) {
        let outcome = self.client.set_theme(&self.view.theme_form);
        match outcome {
            Ok(outcome) if outcome.is_success() => {
                let message = outcome
                    .field("message")
                    .unwrap_or("Theme updated successfully!")
                    .to_string();
                self.notice(&message);
            }
            Ok(_) => self.notice("Failed to update theme."),
            Err(e) => {
                error!("Failed to encode theme form: {e}");
                self.notice("Failed to update theme.");
            }
        }
    }

    fn set_enabled(&mut self, timer: TimerId, enabled: bool) {
        self.view.timer_mut(timer).enabled = enabled;
        self.control(timer, &ControlAction::ToggleEnable { enabled });
    }

    /// One control call followed by an immediate status refresh
    fn control(&mut self, timer: TimerId, action: &ControlAction) {
        match self.client.control_timer(timer, action) {
            Ok(outcome) => {
                if let Err(StageTimerError::HttpStatus { status, message, .. }) =
                    outcome.into_result()
                {
                    warn!("Timer {timer} {} rejected (HTTP {status})", action.name());
                    self.notice(&format!("Error: {message}"));
                }
            }
            Err(e) => error!("Failed to send {} to timer {timer}: {e}", action.name()),
        }
        self.refresh_status();
    }

    fn upload_logo(&mut self, path: &Path, name: &str) {
        match self.client.upload_logo(name, path) {
            Ok(outcome @ ApiOutcome::Success { .. }) => {
                let message = outcome.field("message").unwrap_or("Logo uploaded!").to_string();
                self.notice(&message);
                self.reload_logos();
            }
            Ok(outcome @ ApiOutcome::HttpError { .. }) => {
                let reason = outcome.field("error").unwrap_or("Upload failed").to_string();
                self.notice(&format!("Error: {reason}"));
            }
            Ok(ApiOutcome::TransportFailure { .. }) => {
                self.notice("Logo upload failed. See the log.");
            }
            Err(e) => {
                error!("Logo upload from {} failed: {e}", path.display());
                self.notice("Logo upload failed. See the log.");
            }
        }
    }

    fn delete_logo(&mut self, logo: &Logo) {
        match self.client.delete_logo(&logo.filename) {
            Ok(outcome) => {
                info!("Logo {} deleted", logo.filename);
                self.notice(outcome.notice());
                self.reload_logos();
            }
            Err(StageTimerError::HttpStatus { message, .. }) if !message.is_empty() => {
                self.notice(&format!("Error: {message}"));
            }
            Err(e) => {
                warn!("Failed to delete logo {}: {e}", logo.filename);
                self.notice("Error: Could not delete logo.");
            }
        }
    }

    /// Rebuild the logo list, then refresh status
    fn reload_logos(&mut self) {
        match self.client.get_logos() {
            Ok(logos) => {
                self.view.render_logo_list(logos);
                self.refresh_status();
            }
            Err(e) => warn!("Failed to load logos: {e}"),
        }
    }

    fn refresh_status(&mut self) {
        match self.client.timer_status() {
            Ok(snapshot) => self.view.apply_status(&snapshot),
            Err(e) => warn!("Status refresh failed: {e}"),
        }
    }

    fn notice(&self, message: &str) {
        self.notifier.alert(message);
    }

    fn render(&self) {
        self.console.lock().render(&self.view);
    }
}
