//! Countdown engine
//!
//! Two independent periodic tasks joined only through the shared state
//! cell: a 1-second tick loop that resolves and renders countdowns,
//! and a slow retry loop that re-invokes the provider while the fetch
//! is failing. A hung provider call lives in the retry task and can
//! never stall the tick loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::countdown::{self, AnchorSet, CountdownState};
use crate::provider::AnchorProvider;
use crate::state::{FetchState, StateCell};

/// What the presentation layer receives once per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// No provider call has settled yet; nothing to count down.
    Loading,
    /// The last fetch failed; the retry loop will recover unattended.
    Error(String),
    Counting(Snapshot),
}

/// One resolved countdown frame, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub anchors: AnchorSet,
    pub state: CountdownState,
    pub observance_countdown: String,
    pub work_countdown: String,
}

pub struct Engine {
    provider: AnchorProvider,
    state: Arc<StateCell>,
    config: Arc<Config>,
    fetch_in_flight: AtomicBool,
}

impl Engine {
    pub fn new(config: Arc<Config>, provider: AnchorProvider) -> Self {
        Self {
            provider,
            state: Arc::new(StateCell::new()),
            config,
            fetch_in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> &StateCell {
        &self.state
    }

    /// Current instant on the configured city's wall clock.
    pub fn local_now(&self) -> NaiveDateTime {
        countdown::local_now(self.config.timezone)
    }

    /// One guarded provider round trip. At most one fetch runs at a
    /// time; a caller that loses the race returns immediately and the
    /// in-flight call's outcome lands in the cell.
    pub async fn fetch_once(&self) {
        if self
            .fetch_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Fetch already in flight, skipping");
            return;
        }

        let today = self.local_now().date();
        match self.provider.fetch_today(today).await {
            Ok(anchors) => {
                info!(
                    "Prayer times loaded: sahur {} / iftar {}",
                    anchors.sahur, anchors.iftar
                );
                self.state.set(FetchState::Ready(anchors));
            }
            Err(e) => {
                warn!("Prayer times fetch failed: {}", e);
                self.state.set(FetchState::Error(e.to_string()));
            }
        }

        self.fetch_in_flight.store(false, Ordering::SeqCst);
    }

    /// Resolve one display frame against an explicit instant.
    pub fn snapshot_at(&self, anchors: AnchorSet, now: NaiveDateTime) -> Snapshot {
        let state = countdown::resolve(anchors, self.config.work_end, now);
        Snapshot {
            date: now.date(),
            anchors,
            observance_countdown: countdown::format_hms(state.seconds_to_next_observance),
            work_countdown: countdown::format_hms(state.seconds_to_work_end),
            state,
        }
    }

    /// Read the cell and produce the current frame. No countdown is
    /// computed before the first successful fetch.
    pub fn tick(&self) -> Tick {
        match self.state.get() {
            FetchState::Loading => Tick::Loading,
            FetchState::Error(reason) => Tick::Error(reason),
            FetchState::Ready(anchors) => {
                Tick::Counting(self.snapshot_at(anchors, self.local_now()))
            }
        }
    }

    /// 1-second loop, wall-clock driven. Renders through the callback
    /// and never fetches. Skips missed ticks rather than bursting, so
    /// each rendered frame is recomputed against a fresh instant.
    pub async fn run_tick_loop<F>(&self, cancel: CancellationToken, mut render: F)
    where
        F: FnMut(Tick),
    {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => render(self.tick()),
                _ = cancel.cancelled() => {
                    info!("Tick loop stopped");
                    break;
                }
            }
        }
    }

    /// Retry loop: while the cell is not Ready, re-invoke the provider
    /// on the configured fixed period. Stops once the anchors load or
    /// on cancellation. The first interval tick fires immediately and
    /// is consumed up front; the initial fetch is the caller's move.
    pub async fn run_retry_loop(&self, cancel: CancellationToken) {
        let mut ticker = interval(Duration::from_secs(self.config.retry_interval_secs));
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.state.get().is_ready() {
                        debug!("Anchors loaded, retry loop done");
                        break;
                    }
                    info!("Retrying prayer times fetch");
                    self.fetch_once().await;
                }
                _ = cancel.cancelled() => {
                    info!("Retry loop stopped");
                    break;
                }
            }
        }
    }
}
