//! Background clocks: the slot clock regenerates lanes on a fixed period and
//! the batch poller ingests trades on its own, slower period.
//!
//! The batch countdown only runs while the feed is live. Pausing freezes the
//! remaining time and resuming continues from it. Any batch fetched outside
//! the poller's cadence restarts the full countdown.

use super::desk::Desk;
use crate::datasource::TradeSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

#[derive(Debug)]
struct Countdown {
    /// Set while live and armed.
    deadline: Option<Instant>,
    /// Set while paused.
    frozen: Option<Duration>,
}

/// Shared live/paused switch for both clocks, plus the batch countdown.
#[derive(Debug)]
pub struct FeedControl {
    live: AtomicBool,
    batch_interval: Duration,
    countdown: Mutex<Countdown>,
    changed: Notify,
}

impl FeedControl {
    pub fn new(live: bool, batch_interval: Duration) -> Self {
        let countdown = Countdown {
            deadline: None,
            // A feed created paused fetches as soon as it is resumed.
            frozen: (!live).then_some(Duration::ZERO),
        };
        Self {
            live: AtomicBool::new(live),
            batch_interval,
            countdown: Mutex::new(countdown),
            changed: Notify::new(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    pub fn batch_interval(&self) -> Duration {
        self.batch_interval
    }

    pub fn pause(&self) {
        {
            let mut countdown = self.countdown();
            if self.live.swap(false, Ordering::Relaxed) {
                let remaining = countdown
                    .deadline
                    .take()
                    .map(|at| at.saturating_duration_since(Instant::now()))
                    .unwrap_or(Duration::ZERO);
                countdown.frozen = Some(remaining);
            }
        }
        self.changed.notify_one();
        info!("feed paused");
    }

    pub fn resume(&self) {
        {
            let mut countdown = self.countdown();
            if !self.live.swap(true, Ordering::Relaxed) {
                let remaining = countdown.frozen.take().unwrap_or(Duration::ZERO);
                countdown.deadline = Some(Instant::now() + remaining);
            }
        }
        self.changed.notify_one();
        info!("feed resumed");
    }

    /// Restart the full batch countdown, e.g. after an out-of-band fetch.
    /// While paused the restarted countdown stays frozen.
    pub fn rearm(&self) {
        self.arm();
        self.changed.notify_one();
        debug!(interval_ms = self.batch_interval.as_millis() as u64, "batch countdown rearmed");
    }

    /// Milliseconds until the next scheduled batch, zero if overdue.
    pub fn next_batch_in_ms(&self) -> i64 {
        let countdown = self.countdown();
        let remaining = match (countdown.frozen, countdown.deadline) {
            (Some(frozen), _) => frozen,
            (None, Some(at)) => at.saturating_duration_since(Instant::now()),
            (None, None) => Duration::ZERO,
        };
        remaining.as_millis() as i64
    }

    fn arm(&self) {
        let mut countdown = self.countdown();
        if self.is_live() {
            countdown.deadline = Some(Instant::now() + self.batch_interval);
            countdown.frozen = None;
        } else {
            countdown.deadline = None;
            countdown.frozen = Some(self.batch_interval);
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.countdown().deadline
    }

    fn countdown(&self) -> MutexGuard<'_, Countdown> {
        self.countdown.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FeedControl {
    fn default() -> Self {
        Self::new(true, Duration::from_secs(120))
    }
}

/// Advance the desk's slot every `period` while the feed is live.
pub fn spawn_slot_clock(desk: Arc<Desk>, control: Arc<FeedControl>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if control.is_live() {
                desk.advance_slot().await;
            } else {
                trace!("slot clock idle, feed paused");
            }
        }
    })
}

/// Ingest a batch immediately, then once per batch interval of live time.
/// Pause, resume and rearm on `control` move the next tick accordingly.
pub fn spawn_batch_poller(
    desk: Arc<Desk>,
    source: Arc<dyn TradeSource>,
    control: Arc<FeedControl>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(control.batch_interval());
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !control.is_live() {
                        continue;
                    }
                    control.arm();
                    if let Err(e) = desk.ingest_batch(source.as_ref()).await {
                        warn!(error = %e, "batch skipped");
                    }
                }
                _ = control.changed.notified() => {
                    if let Some(at) = control.deadline() {
                        ticker.reset_at(at);
                    }
                }
            }
        }
    })
}
