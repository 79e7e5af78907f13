//! Timer driver background task
//!
//! The driver is the single thread of control for the timer: user commands
//! and clock ticks are processed one at a time, each to completion, so a
//! completion transition never interleaves with another tick.

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    clock::{ClockSource, TickReceiver},
    error::TimerError,
    presenter::{Presenter, SoundSelection},
    store::KeyValueStore,
    timer::{PomodoroTimer, TickOutcome, TimerSnapshot},
};

/// Pending commands before senders wait
const COMMAND_BUFFER: usize = 32;

/// User-initiated timer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    SetWorkDuration(u32),
    SetBreakDuration(u32),
    SetSound(SoundSelection),
    SetDarkMode(bool),
    Snapshot,
}

impl TimerCommand {
    /// Short name used for last-action tracking
    pub fn name(&self) -> &'static str {
        match self {
            TimerCommand::Start => "start",
            TimerCommand::Pause => "pause",
            TimerCommand::Reset => "reset",
            TimerCommand::SetWorkDuration(_) => "set-work-duration",
            TimerCommand::SetBreakDuration(_) => "set-break-duration",
            TimerCommand::SetSound(_) => "set-sound",
            TimerCommand::SetDarkMode(_) => "set-theme",
            TimerCommand::Snapshot => "snapshot",
        }
    }
}

type CommandReply = oneshot::Sender<Result<TimerSnapshot, TimerError>>;

/// Cloneable handle for talking to a running driver
#[derive(Debug, Clone)]
pub struct TimerHandle {
    command_tx: mpsc::Sender<(TimerCommand, CommandReply)>,
    snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl TimerHandle {
    /// Run a command on the driver and wait for the resulting snapshot
    pub async fn send(&self, command: TimerCommand) -> Result<TimerSnapshot, TimerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send((command, reply_tx))
            .await
            .map_err(|_| TimerError::DriverUnavailable)?;
        reply_rx.await.map_err(|_| TimerError::DriverUnavailable)?
    }

    /// Latest snapshot published by the driver
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_rx.borrow().clone()
    }
}

/// Spawn the driver for `timer`.
///
/// The task ends once every [`TimerHandle`] is dropped; its join handle then
/// yields the store of the disposed timer.
pub fn spawn_timer_driver<S, P, C>(
    timer: PomodoroTimer<S, P, C>,
    ticks: TickReceiver,
) -> (TimerHandle, JoinHandle<S>)
where
    S: KeyValueStore + Send + 'static,
    P: Presenter + Send + 'static,
    C: ClockSource + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());

    let task = tokio::spawn(timer_driver_task(timer, ticks, command_rx, snapshot_tx));
    let handle = TimerHandle {
        command_tx,
        snapshot_rx,
    };
    (handle, task)
}

/// Background task that owns the timer and feeds it commands and ticks
pub async fn timer_driver_task<S, P, C>(
    mut timer: PomodoroTimer<S, P, C>,
    mut ticks: TickReceiver,
    mut commands: mpsc::Receiver<(TimerCommand, CommandReply)>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
) -> S
where
    S: KeyValueStore,
    P: Presenter,
    C: ClockSource,
{
    info!("Starting timer driver task");

    loop {
        tokio::select! {
            // Commands first so a reset beats any tick already queued
            biased;

            command = commands.recv() => {
                let Some((command, reply)) = command else {
                    debug!("Command channel closed");
                    break;
                };

                let result = apply_command(&mut timer, command);
                if reply.send(result).is_err() {
                    warn!("Caller went away before {} completed", command.name());
                }
            }

            Some(subscription) = ticks.recv() => {
                match timer.on_tick(subscription) {
                    Ok(TickOutcome::Completed(finished)) => {
                        info!("{} interval finished", finished);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Failed to persist session stats: {}", e);
                    }
                }
            }
        }

        snapshot_tx.send_replace(timer.snapshot());
    }

    info!("Timer driver stopped");
    timer.dispose()
}

fn apply_command<S, P, C>(
    timer: &mut PomodoroTimer<S, P, C>,
    command: TimerCommand,
) -> Result<TimerSnapshot, TimerError>
where
    S: KeyValueStore,
    P: Presenter,
    C: ClockSource,
{
    debug!("Applying {:?}", command);

    let result = match command {
        TimerCommand::Start => {
            timer.start();
            Ok(())
        }
        TimerCommand::Pause => {
            timer.pause();
            Ok(())
        }
        TimerCommand::Reset => {
            timer.reset();
            Ok(())
        }
        TimerCommand::SetWorkDuration(minutes) => timer.set_work_duration(minutes),
        TimerCommand::SetBreakDuration(minutes) => timer.set_break_duration(minutes),
        TimerCommand::SetSound(selection) => {
            timer.set_sound(selection);
            Ok(())
        }
        TimerCommand::SetDarkMode(enabled) => {
            timer.set_dark_mode(enabled).map_err(TimerError::from)
        }
        TimerCommand::Snapshot => Ok(()),
    };

    match result {
        Ok(()) => Ok(timer.snapshot()),
        // Applied in memory; the next successful write catches the store up
        Err(TimerError::Persistence(e)) => {
            error!("Failed to persist configuration: {}", e);
            Ok(timer.snapshot())
        }
        Err(e) => Err(e),
    }
}
