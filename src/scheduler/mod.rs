//! Cooperative, cancellable repeating timer driving auto-refresh.
//!
//! A timer task sleeps for the interval and posts a [`Tick`] tagged with the
//! chain's generation, then re-arms itself. Ticks are consumed on the control
//! thread, which runs the refresh. `stop()` bumps the generation and aborts
//! the task, so ticks already queued from an old chain are discarded on
//! receipt: nothing scheduled before `stop()` can fire after it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// One firing of the refresh chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub fired_at: Instant,
}

pub struct RefreshScheduler {
    generation: u64,
    interval: Option<Duration>,
    handle: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshScheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 0,
            interval: None,
            handle: None,
            tx,
            rx,
        }
    }

    /// Arm a fresh chain firing every `interval`, first firing one interval
    /// from now. Any running chain is stopped first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, interval: Duration) {
        self.stop();
        let generation = self.generation;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let tick = Tick {
                    generation,
                    fired_at: Instant::now(),
                };
                if tx.send(tick).is_err() {
                    break;
                }
            }
        }));
        self.interval = Some(interval);
        tracing::debug!(
            generation,
            interval_ms = interval.as_millis() as u64,
            "refresh chain started"
        );
    }

    /// Cancel all pending and future firings of the current chain.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "refresh chain stopped");
        }
        self.generation += 1;
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait for the next live tick. Pending forever while stopped, which
    /// makes it safe to use as a `select!` branch.
    pub async fn next_tick(&mut self) -> Tick {
        loop {
            if !self.is_running() {
                std::future::pending::<()>().await;
            }
            match self.rx.recv().await {
                Some(tick) if tick.generation == self.generation => {
                    return self.coalesce(tick);
                }
                Some(_) => continue,
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Take the ready tick without waiting, if any.
    pub fn try_tick(&mut self) -> Option<Tick> {
        while let Ok(tick) = self.rx.try_recv() {
            if tick.generation == self.generation && self.is_running() {
                return Some(self.coalesce(tick));
            }
        }
        None
    }

    /// Run `callback` for the ready tick, if any. Returns whether it ran.
    pub fn run_pending<F: FnMut(Tick)>(&mut self, mut callback: F) -> bool {
        match self.try_tick() {
            Some(tick) => {
                callback(tick);
                true
            }
            None => false,
        }
    }

    /// Ticks that queued up while the control thread was busy collapse into
    /// the newest one; the overlapping requests are dropped.
    fn coalesce(&mut self, first: Tick) -> Tick {
        let mut latest = first;
        let mut dropped = 0usize;
        while let Ok(tick) = self.rx.try_recv() {
            if tick.generation == self.generation {
                latest = tick;
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "refresh overlapped with pending ticks, coalesced");
        }
        latest
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
