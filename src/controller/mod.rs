//! Admin console controller module
//!
//! This module binds operator commands to timer service calls and keeps the
//! console's view of every timer in sync with the service.
//!
//! # Overview
//!
//! The admin controller is the central coordinator that:
//! - **Parses operator commands** typed on the console (`command`)
//! - **Issues service calls** for timer control, theme, PIN and logo management
//! - **Applies status polls** to the per-timer displays
//! - **Persists the console's page theme** to the client configuration
//!
//! # Architecture
//!
//! - `AdminController`: single writer of the `AdminView`
//! - `AdminView`: everything shown on the console
//! - `Console`: locked writer shared with the `ConsoleNotifier`
//!
//! # Event Flow
//!
//! ```text
//! stdin ──► parse_command ──► AdminEvent::Command ─┐
//! StatusPoller ─────────────► AdminEvent::Poll ────┼─► AdminController ─► AdminView ─► Console
//! event loop timeout ───────► AdminEvent::Tick ────┘
//! ```
//!
//! # Control Actions
//!
//! Every timer action issues exactly one `/api/control_timer/<id>` call and
//! then refreshes status immediately instead of waiting for the next poll.
//! Local changes (enable toggle, logo selection) are provisional until the
//! next accepted snapshot overwrites them.

pub mod admin_controller;
pub mod admin_view;
pub mod command;
pub mod console;

pub use admin_controller::{AdminController, AdminEvent, Flow, PIN_DIALOG_DISMISS};
pub use admin_view::{AdminView, PinDialog, StatusLine, TimerControls, Tone, ViewLine};
pub use command::{AdminCommand, help_text, parse_command};
pub use console::{Console, ConsoleNotifier, SharedConsole};
