//! Status monitoring module
//!
//! This module keeps each surface in step with the timer service by polling
//! `/api/timer_status` in the background.
//!
//! # Overview
//!
//! - **Background polling** at a configurable interval (1000 ms for the
//!   viewer, 2000 ms for the admin console by default)
//! - **Event notification** through a bounded `mpsc` channel to the single
//!   thread that owns the view state
//! - **Failure tolerance**: a failed cycle is sent as `PollEvent::Failed`
//!   and the next cycle runs as usual
//!
//! # Event Flow
//!
//! ```text
//! StatusPoller → PollEvent → (ViewerApp | AdminController) → render
//! ```
//!
//! Responses are applied in arrival order; the last applied snapshot wins.
//!
//! # Example Usage
//!
//! ```no_run
//! use stagetimer::api::ApiClient;
//! use stagetimer::config::ServiceSettings;
//! use stagetimer::monitor::{PollEvent, StatusPoller};
//! use std::sync::{Arc, mpsc};
//! use std::time::Duration;
//!
//! let client = Arc::new(ApiClient::new(&ServiceSettings::default()).unwrap());
//! let (tx, rx) = mpsc::sync_channel::<PollEvent>(32);
//! StatusPoller::new(client, Duration::from_millis(1000), tx).start();
//!
//! while let Ok(event) = rx.recv() {
//!     match event {
//!         PollEvent::Snapshot(snapshot) => println!("{} timers", snapshot.timers.len()),
//!         PollEvent::Failed(e) => eprintln!("poll failed: {e}"),
//!     }
//! }
//! ```

pub mod status_poller;

pub use status_poller::{PollEvent, StatusPoller};
