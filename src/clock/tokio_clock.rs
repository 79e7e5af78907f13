//! Tick source backed by `tokio::time::interval`

use std::{collections::HashMap, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

use super::{ClockSource, SubscriptionId};

/// Receiving half that the driver loop selects on
pub type TickReceiver = mpsc::UnboundedReceiver<SubscriptionId>;

/// Spawns one interval task per subscription and aborts it on cancel.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioClock {
    tick_tx: mpsc::UnboundedSender<SubscriptionId>,
    tasks: HashMap<SubscriptionId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioClock {
    /// Create a clock and the channel its ticks arrive on
    pub fn new() -> (Self, TickReceiver) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let clock = Self {
            tick_tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (clock, tick_rx)
    }

    /// Number of live tick tasks
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl ClockSource for TokioClock {
    fn schedule(&mut self, period: Duration) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let tick_tx = self.tick_tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            // Late ticks are delivered late, never in a burst
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tick_tx.send(id).is_err() {
                    break;
                }
            }
        });

        debug!("Scheduled {} every {:?}", id, period);
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: SubscriptionId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
            debug!("Cancelled {}", id);
        }
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
