//! Audience-facing viewer
//!
//! The viewer owns one `ViewerRenderer` and redraws whenever a status poll
//! is accepted. It has no controls besides quitting.
//!
//! # Architecture
//!
//! - `format`: countdown text and low-time rules
//! - `scene`: the `ViewerScene` view model
//! - `renderer`: snapshot to scene, single owner of the last theme
//! - `terminal`: ratatui `DisplaySurface`
//!
//! # Event Flow
//!
//! ```text
//! StatusPoller → PollEvent → ViewerApp → ViewerRenderer → ViewerScene → DisplaySurface
//! ```
//!
//! A failed poll is logged and the last scene stays on screen.

pub mod format;
pub mod renderer;
pub mod scene;
pub mod terminal;

pub use format::{format_admin_time, format_time, is_low_time};
pub use renderer::ViewerRenderer;
pub use scene::{Emphasis, LayoutMode, TimerPanel, ViewerScene};
pub use terminal::{DisplaySurface, SurfaceInput, TerminalSurface};

use crate::error::Result;
use crate::monitor::PollEvent;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tracing::{info, warn};

/// How long to wait for a poll result before checking for input
const EVENT_WAIT: Duration = Duration::from_millis(100);

/// Viewer event loop
pub struct ViewerApp {
    renderer: ViewerRenderer,
    events: mpsc::Receiver<PollEvent>,
}

impl ViewerApp {
    /// Create a viewer fed by `events`
    pub fn new(renderer: ViewerRenderer, events: mpsc::Receiver<PollEvent>) -> Self {
        Self { renderer, events }
    }

    /// Current scene
    pub fn scene(&self) -> &ViewerScene {
        self.renderer.scene()
    }

    /// Apply one poll result; returns whether the scene should be redrawn
    pub fn handle_event(&mut self, event: PollEvent) -> bool {
        match event {
            PollEvent::Snapshot(snapshot) => {
                self.renderer.apply(&snapshot);
                true
            }
            PollEvent::Failed(e) => {
                warn!("Keeping last viewer scene after failed poll: {e}");
                false
            }
        }
    }

    /// Run until the operator quits or the poller stops
    pub fn run<S: DisplaySurface>(&mut self, surface: &mut S) -> Result<()> {
        info!("Viewer started");
        surface.present(self.renderer.scene())?;

        loop {
            match self.events.recv_timeout(EVENT_WAIT) {
                Ok(event) => {
                    if self.handle_event(event) {
                        surface.present(self.renderer.scene())?;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Status poller disconnected; viewer exiting");
                    break;
                }
            }

            match surface.poll_input(Duration::ZERO)? {
                SurfaceInput::Quit => break,
                SurfaceInput::Resize => surface.present(self.renderer.scene())?,
                SurfaceInput::Idle => {}
            }
        }

        info!("Viewer stopped");
        Ok(())
    }
}
