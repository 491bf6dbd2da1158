//! Engine - shared orchestration state for the runners
//!
//! The Engine owns the message channel, the timer scheduler, the dispatcher
//! worker, the shutdown signal and the optional config watcher. Pointer
//! events, timer fires and environment changes all go through one queue and
//! are processed by a single consumer.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actions::{spawn_dispatch_worker, ActionContext};
use crate::config::{GestureConfig, Settings};
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::services::ActionDispatcher;
use crate::session::SessionId;
use crate::signals;
use crate::state::AppState;
use crate::watcher::ConfigWatcher;
use swipenav_core::prelude::{Error, Result};
use swipenav_core::{CandidateAction, Point};

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    gesture: Option<GestureSnapshot>,
    config: Arc<GestureConfig>,
}

#[derive(Debug, Clone, Copy)]
struct GestureSnapshot {
    id: SessionId,
    candidate: CandidateAction,
    start_point: Point,
    fired: bool,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            gesture: state.session.as_ref().map(|s| GestureSnapshot {
                id: s.id,
                candidate: s.candidate(),
                start_point: s.start_point,
                fired: s.action_fired(),
            }),
            config: Arc::clone(&state.config),
        }
    }
}

/// Orchestration engine for swipenav.
///
/// Generic over the [`ActionDispatcher`] so tests can record what the
/// recognizer asked for.
pub struct Engine<D> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, watcher, runners).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Timer scheduler, dispatcher handle and reload plumbing
    actions: ActionContext<D>,

    /// Worker delivering commands to the dispatcher in order
    dispatch_worker: Option<JoinHandle<()>>,

    /// Config file watcher. None unless started.
    config_watcher: Option<ConfigWatcher>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<D: ActionDispatcher + Sync + 'static> Engine<D> {
    /// Create a new Engine.
    ///
    /// Performs all shared initialization:
    /// - Creates AppState from settings
    /// - Creates message channel (capacity 256)
    /// - Creates shutdown signal channel
    /// - Spawns the dispatcher worker
    /// - Spawns signal handler
    ///
    /// `config_path` is re-read on [`Message::ReloadConfig`].
    pub fn new(settings: Settings, dispatcher: Arc<D>, config_path: Option<PathBuf>) -> Self {
        let state = AppState::with_settings(settings);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let dispatch_worker =
            spawn_dispatch_worker(dispatcher.clone(), command_rx, shutdown_rx.clone());

        signals::spawn_signal_handler(msg_tx.clone());

        let actions = ActionContext::new(dispatcher, msg_tx.clone(), command_tx, config_path);

        // Broadcast channel for engine events (capacity 256)
        let (event_tx, _) = broadcast::channel(256);

        info!(
            "Engine ready: {:?} edge, {}x{} px, min swipe {}px",
            state.config.nav_bar_position,
            state.config.screen_short_px,
            state.config.screen_long_px,
            state.config.min_swipe_length_px
        );

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            actions,
            dispatch_worker: Some(dispatch_worker),
            config_watcher: None,
            event_tx,
        }
    }

    /// Start watching the config file for changes.
    ///
    /// Changes post [`Message::ReloadConfig`]; the engine re-reads the file
    /// and keeps the previous config if it is broken.
    pub fn start_config_watcher(&mut self) -> Result<()> {
        let Some(path) = self.actions.config_path().cloned() else {
            return Err(Error::config("No config file to watch"));
        };

        let mut watcher = ConfigWatcher::new(path);
        watcher.start(self.msg_tx.clone())?;
        self.config_watcher = Some(watcher);
        Ok(())
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Emits gesture lifecycle events from before/after snapshots and the
    /// events produced by executed actions, in that order.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        let action_events = process::process_message(&mut self.state, msg, &mut self.actions);

        let post = StateSnapshot::capture(&self.state);

        self.emit_events(&pre, &post, action_events);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message and process it.
    ///
    /// Returns false once the channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver for background tasks.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// The dispatcher commands are delivered to
    pub fn dispatcher(&self) -> &Arc<D> {
        &self.actions.dispatcher
    }

    pub fn is_watching_config(&self) -> bool {
        self.config_watcher
            .as_ref()
            .map(ConfigWatcher::is_running)
            .unwrap_or(false)
    }

    /// Initiate shutdown: stop watcher and timers, flush the dispatcher.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        if let Some(ref mut watcher) = self.config_watcher {
            watcher.stop();
        }

        self.actions.scheduler.cancel_all();

        // Signal background tasks to stop
        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = self.dispatch_worker.take() {
            match tokio::time::timeout(Duration::from_secs(2), handle).await {
                Ok(Ok(())) => debug!("Dispatcher worker drained"),
                Ok(Err(e)) => warn!("Dispatcher worker panicked: {}", e),
                Err(_) => warn!("Dispatcher worker shutdown timed out"),
            }
        }
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(
        &self,
        pre: &StateSnapshot,
        post: &StateSnapshot,
        action_events: Vec<EngineEvent>,
    ) {
        let pre_id = pre.gesture.map(|g| g.id);
        let post_id = post.gesture.map(|g| g.id);
        let ended = pre.gesture.filter(|_| post_id != pre_id);

        // A Down that replaced a stale gesture closes it before opening the next
        if let Some(replaced) = ended.filter(|_| post_id.is_some()) {
            self.emit(EngineEvent::GestureEnded {
                gesture_id: replaced.id,
                fired: replaced.fired,
            });
        }

        if let Some(started) = post.gesture.filter(|_| post_id != pre_id) {
            self.emit(EngineEvent::GestureStarted {
                gesture_id: started.id,
                candidate: started.candidate,
                x: started.start_point.x,
                y: started.start_point.y,
            });
        }

        if !Arc::ptr_eq(&pre.config, &post.config) {
            self.emit(EngineEvent::ConfigReloaded {
                nav_bar_position: post.config.nav_bar_position,
                edge_threshold_px: post.config.edge_threshold_px,
                min_swipe_length_px: post.config.min_swipe_length_px,
                trigger_timeout_ms: post.config.trigger_timeout_ms,
            });
        }

        let fired_now = action_events.iter().any(EngineEvent::is_navigation);
        for event in action_events {
            self.emit(event);
        }

        if let Some(ended) = ended.filter(|_| post_id.is_none()) {
            self.emit(EngineEvent::GestureEnded {
                gesture_id: ended.id,
                fired: ended.fired || fired_now,
            });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
