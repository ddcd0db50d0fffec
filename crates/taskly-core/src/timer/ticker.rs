//! Once-per-second tick delivery.
//!
//! The engine never sleeps. A [`TickScheduler`] arranges for a [`TickId`] to
//! be delivered back to the owner of the engine once per elapsed second, and
//! hands out a [`TickHandle`] that stops the delivery when cancelled or
//! dropped. Ticks already in flight when a handle is cancelled still arrive;
//! the engine drops them by comparing ids.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Identifies one scheduled run of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// Owned, cancellable handle for a scheduled tick run.
///
/// Dropping the handle cancels the run.
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(id: TickId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle").field("id", &self.id).finish()
    }
}

pub trait TickScheduler {
    /// Start delivering `id` once per second until the handle is cancelled.
    fn schedule(&mut self, id: TickId) -> TickHandle;
}

/// Scheduler backed by a tokio interval task per run.
///
/// Ticks arrive on the receiver returned by [`TokioTicker::channel`].
/// `schedule` must be called from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<TickId>,
    period: Duration,
}

impl TokioTicker {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TickId>) {
        Self::with_period(Duration::from_secs(1))
    }

    /// Same as [`TokioTicker::channel`] with a custom period. Used to run
    /// countdowns faster than real time.
    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<TickId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, period }, rx)
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, id: TickId) -> TickHandle {
        let tx = self.tx.clone();
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });
        TickHandle::new(id, move || task.abort())
    }
}

/// Scheduler that never fires on its own. Tests deliver ticks by hand and
/// use the [`ManualTickerProbe`] to see which runs are still live.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    live: Arc<Mutex<BTreeSet<TickId>>>,
    scheduled: Arc<Mutex<u64>>,
}

impl ManualTicker {
    pub fn new() -> (Self, ManualTickerProbe) {
        let ticker = Self::default();
        let probe = ManualTickerProbe {
            live: Arc::clone(&ticker.live),
            scheduled: Arc::clone(&ticker.scheduled),
        };
        (ticker, probe)
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, id: TickId) -> TickHandle {
        if let Ok(mut live) = self.live.lock() {
            live.insert(id);
        }
        if let Ok(mut scheduled) = self.scheduled.lock() {
            *scheduled += 1;
        }
        let live = Arc::clone(&self.live);
        TickHandle::new(id, move || {
            if let Ok(mut live) = live.lock() {
                live.remove(&id);
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct ManualTickerProbe {
    live: Arc<Mutex<BTreeSet<TickId>>>,
    scheduled: Arc<Mutex<u64>>,
}

impl ManualTickerProbe {
    /// Runs scheduled and not yet cancelled.
    pub fn live(&self) -> Vec<TickId> {
        self.live
            .lock()
            .map(|live| live.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of runs ever scheduled.
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled.lock().map(|n| *n).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_handle_cancels_on_drop() {
        let (mut ticker, probe) = ManualTicker::new();
        let handle = ticker.schedule(TickId(1));
        assert_eq!(probe.live(), vec![TickId(1)]);
        drop(handle);
        assert!(probe.live().is_empty());
        assert_eq!(probe.scheduled_count(), 1);
    }

    #[test]
    fn explicit_cancel_runs_once() {
        let (mut ticker, probe) = ManualTicker::new();
        let first = ticker.schedule(TickId(1));
        let _second = ticker.schedule(TickId(2));
        first.cancel();
        assert_eq!(probe.live(), vec![TickId(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_delivers_until_cancelled() {
        let (mut ticker, mut rx) = TokioTicker::channel();
        let handle = ticker.schedule(TickId(7));

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert_eq!(rx.recv().await, Some(TickId(7)));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(rx.recv().await, Some(TickId(7)));

        handle.cancel();
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
