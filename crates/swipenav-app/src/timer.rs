//! Cancellable named timers feeding the engine queue
//!
//! A timer never calls into the state machine directly. When it expires it
//! posts [`Message::TimerFired`] into the same channel pointer events use, so
//! fires are serialized with Down/Move/Up. Each schedule bumps a per-id
//! generation; [`TimerScheduler::acknowledge`] drops fires that raced a
//! cancel or reschedule.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::message::Message;

/// Logical timers used by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Stationary Home hold
    LongPress,
    /// Paused swipe waiting to open recents
    RecentsSwitch,
}

impl TimerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerId::LongPress => "long_press",
            TimerId::RecentsSwitch => "recents_switch",
        }
    }
}

#[derive(Debug)]
struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Tokio-backed scheduler for [`TimerId`]s
#[derive(Debug)]
pub struct TimerScheduler {
    msg_tx: mpsc::Sender<Message>,
    pending: HashMap<TimerId, PendingTimer>,
    next_generation: u64,
}

impl TimerScheduler {
    pub fn new(msg_tx: mpsc::Sender<Message>) -> Self {
        Self {
            msg_tx,
            pending: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Schedule `timer` after `delay`, replacing any pending instance
    ///
    /// Returns the generation carried by the eventual fire.
    pub fn schedule(&mut self, timer: TimerId, delay: Duration) -> u64 {
        self.cancel(timer);

        let generation = self.next_generation;
        self.next_generation += 1;

        let tx = self.msg_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx
                .send(Message::TimerFired { timer, generation })
                .await
                .is_err()
            {
                trace!("Timer {} fired after engine shut down", timer.as_str());
            }
        });

        debug!(
            "Scheduled {} in {:?} (generation {})",
            timer.as_str(),
            delay,
            generation
        );
        self.pending.insert(timer, PendingTimer { generation, handle });
        generation
    }

    /// Cancel `timer`; no-op if it is not pending
    pub fn cancel(&mut self, timer: TimerId) {
        if let Some(pending) = self.pending.remove(&timer) {
            pending.handle.abort();
            trace!(
                "Cancelled {} (generation {})",
                timer.as_str(),
                pending.generation
            );
        }
    }

    /// Cancel everything (shutdown)
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }

    /// Accept a fire if it belongs to the currently pending instance
    ///
    /// Clears the pending entry on success. Stale generations (the timer was
    /// cancelled or rescheduled after this fire was queued) return false.
    pub fn acknowledge(&mut self, timer: TimerId, generation: u64) -> bool {
        match self.pending.get(&timer) {
            Some(pending) if pending.generation == generation => {
                self.pending.remove(&timer);
                true
            }
            _ => {
                debug!(
                    "Dropping stale {} fire (generation {})",
                    timer.as_str(),
                    generation
                );
                false
            }
        }
    }

    pub fn is_pending(&self, timer: TimerId) -> bool {
        self.pending.contains_key(&timer)
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
