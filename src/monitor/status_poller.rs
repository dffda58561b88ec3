//! Status polling implementation
//!
//! Fetches `/api/timer_status` on a fixed interval and forwards each result
//! to the owning surface over a bounded channel. A failed cycle is reported
//! and polling continues; the thread ends only when the receiver is dropped.

use crate::api::{ApiClient, StatusSnapshot};
use crate::error::StageTimerError;
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of one poll cycle
#[derive(Debug)]
pub enum PollEvent {
    /// The service answered with a decodable status
    Snapshot(StatusSnapshot),
    /// The cycle failed; the last applied state should be kept
    Failed(StageTimerError),
}

/// Background poller for timer status
///
/// Generic over the channel's event type so each surface can route poll
/// results into its own event enum.
pub struct StatusPoller<E> {
    client: Arc<ApiClient>,
    interval: Duration,
    sender: mpsc::SyncSender<E>,
}

impl<E> StatusPoller<E>
where
    E: From<PollEvent> + Send + 'static,
{
    /// Create a poller sending into `sender` every `interval`
    pub fn new(client: Arc<ApiClient>, interval: Duration, sender: mpsc::SyncSender<E>) -> Self {
        Self {
            client,
            interval,
            sender,
        }
    }

    /// Fetch status once
    pub fn poll_once(&self) -> PollEvent {
        match self.client.timer_status() {
            Ok(snapshot) => {
                debug!("Status poll returned {} timer(s)", snapshot.timers.len());
                PollEvent::Snapshot(snapshot)
            }
            Err(e) => {
                warn!("Status poll failed: {e}");
                PollEvent::Failed(e)
            }
        }
    }

    /// Start the polling thread
    ///
    /// The first poll happens immediately.
    pub fn start(self) -> JoinHandle<()> {
        thread::spawn(move || {
            info!("Status poller started ({} ms interval)", self.interval.as_millis());
            loop {
                let started = Instant::now();
                let event = self.poll_once();
                if self.sender.send(E::from(event)).is_err() {
                    info!("Status receiver dropped; poller exiting");
                    break;
                }
                thread::sleep(next_delay(self.interval, started.elapsed()));
            }
        })
    }
}

/// Time left in the current cycle once a poll has taken `elapsed`
fn next_delay(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}
