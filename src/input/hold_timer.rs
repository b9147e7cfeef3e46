//! Cancellable one-shot timer for hold detection.
//!
//! A worker thread waits on a command channel. `start` arms it with a
//! deadline, `stop` disarms it, and when an armed deadline passes the
//! callback is invoked with the generation the timer was armed with. The
//! owner compares that generation with its own under its lock, which
//! rejects timeouts that raced with a later stop or restart.
//!
//! The worker exits once the owning [`HoldTimer`] is dropped.

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

#[derive(Debug)]
enum TimerCommand {
    Start { generation: u64, timeout: Duration },
    Stop,
}

/// Handle to the hold-timer worker thread.
#[derive(Debug)]
pub struct HoldTimer {
    commands: Sender<TimerCommand>,
}

impl HoldTimer {
    /// Spawn the worker; `on_timeout` runs on the worker thread.
    pub fn spawn<F>(on_timeout: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        let (tx, rx) = crossbeam::channel::unbounded();

        std::thread::spawn(move || run(rx, on_timeout));

        Self { commands: tx }
    }

    /// Arm (or re-arm) the timer.
    pub fn start(&self, generation: u64, timeout: Duration) {
        self.send(TimerCommand::Start {
            generation,
            timeout,
        });
    }

    /// Disarm the timer.
    pub fn stop(&self) {
        self.send(TimerCommand::Stop);
    }

    fn send(&self, command: TimerCommand) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Hold timer worker is gone, dropping {:?}", e.into_inner());
                false
            }
        }
    }
}

fn run<F>(rx: Receiver<TimerCommand>, mut on_timeout: F)
where
    F: FnMut(u64),
{
    let mut armed: Option<(u64, Instant)> = None;

    loop {
        let command = match armed {
            Some((generation, deadline)) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => {
                        armed = None;
                        tracing::trace!(generation, "Hold timer fired");
                        on_timeout(generation);
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
        };

        match command {
            TimerCommand::Start {
                generation,
                timeout,
            } => armed = Some((generation, Instant::now() + timeout)),
            TimerCommand::Stop => armed = None,
        }
    }

    tracing::trace!("Hold timer worker exiting");
}
