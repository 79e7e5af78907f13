//! Hand-driven clock for tests and embedders that own their own loop

use std::{collections::BTreeSet, time::Duration};

use super::{ClockSource, SubscriptionId};

/// Records schedule/cancel calls; never ticks on its own
#[derive(Debug, Default)]
pub struct ManualClock {
    next_id: u64,
    active: BTreeSet<SubscriptionId>,
    scheduled: Vec<(SubscriptionId, Duration)>,
    cancelled: Vec<SubscriptionId>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions scheduled and not yet cancelled
    pub fn active(&self) -> Vec<SubscriptionId> {
        self.active.iter().copied().collect()
    }

    /// Every `schedule` call in order
    pub fn scheduled(&self) -> &[(SubscriptionId, Duration)] {
        &self.scheduled
    }

    /// Every `cancel` call for a live subscription, in order
    pub fn cancelled(&self) -> &[SubscriptionId] {
        &self.cancelled
    }
}

impl ClockSource for ManualClock {
    fn schedule(&mut self, period: Duration) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.active.insert(id);
        self.scheduled.push((id, period));
        id
    }

    fn cancel(&mut self, id: SubscriptionId) {
        if self.active.remove(&id) {
            self.cancelled.push(id);
        }
    }
}
