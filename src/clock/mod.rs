//! Repeating tick sources
//!
//! A clock hands out one [`SubscriptionId`] per `schedule` call and delivers
//! that id once per period until it is cancelled. Consumers compare incoming
//! ids with the subscription they currently own, so a tick that was already
//! in flight when `cancel` returned is recognisably stale.

pub mod manual;
pub mod tokio_clock;

pub use manual::ManualClock;
pub use tokio_clock::{TickReceiver, TokioClock};

use std::{fmt, time::Duration};

/// Nominal tick period of the countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle for one scheduled tick stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Schedules and cancels periodic ticks
pub trait ClockSource {
    /// Begin delivering ticks every `period`
    fn schedule(&mut self, period: Duration) -> SubscriptionId;

    /// Stop delivering ticks for `id`. Unknown ids are ignored.
    fn cancel(&mut self, id: SubscriptionId);
}
