//! `stagetimer` - Operator console and full-screen viewer for a stage countdown timer service
//!
//! Talks to an external Timer/Theme service over HTTP/JSON. Two surfaces share
//! one API client: the `viewer` renders up to two timers full-screen, and the
//! `controller` drives them from an interactive operator console. Both stay in
//! sync by polling `/api/timer_status` through `monitor::StatusPoller`.

// Module declarations
pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod monitor;
pub mod utils;
pub mod viewer;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{Result, StageTimerError};
