//! Action handlers: UpdateAction execution and background task spawning

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use swipenav_core::NavCommand;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::config;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::services::{deliver, ActionDispatcher};
use crate::timer::TimerScheduler;
use crate::UpdateAction;

/// Delay between a fire and its haptic pulse
pub const HAPTIC_DELAY: Duration = Duration::from_millis(10);

/// Everything action execution needs besides the state
pub struct ActionContext<D> {
    pub scheduler: TimerScheduler,
    pub dispatcher: Arc<D>,
    pub msg_tx: mpsc::Sender<Message>,
    command_tx: mpsc::UnboundedSender<NavCommand>,
    config_path: Option<PathBuf>,
}

impl<D: ActionDispatcher + Sync + 'static> ActionContext<D> {
    pub fn new(
        dispatcher: Arc<D>,
        msg_tx: mpsc::Sender<Message>,
        command_tx: mpsc::UnboundedSender<NavCommand>,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self {
            scheduler: TimerScheduler::new(msg_tx.clone()),
            dispatcher,
            msg_tx,
            command_tx,
            config_path,
        }
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }
}

/// Execute an action, returning the event it produced (if any)
pub fn handle_action<D: ActionDispatcher + Sync + 'static>(
    action: UpdateAction,
    ctx: &mut ActionContext<D>,
) -> Option<EngineEvent> {
    match action {
        UpdateAction::ScheduleTimer { timer, delay } => {
            ctx.scheduler.schedule(timer, delay);
            None
        }

        UpdateAction::CancelTimer(timer) => {
            ctx.scheduler.cancel(timer);
            None
        }

        UpdateAction::Dispatch(command) => {
            if ctx.command_tx.send(command).is_err() {
                warn!("Dispatcher worker gone, dropping {}", command.label());
                return None;
            }
            Some(EngineEvent::CommandDispatched { command })
        }

        UpdateAction::Haptic { duration_ms } => {
            spawn_haptic(ctx.dispatcher.clone(), duration_ms);
            Some(EngineEvent::HapticRequested { duration_ms })
        }

        UpdateAction::ReloadConfig => {
            match ctx.config_path.clone() {
                Some(path) => spawn_config_reload(path, ctx.msg_tx.clone()),
                None => debug!("Reload requested without a config file"),
            }
            None
        }
    }
}

/// Spawn the single worker that delivers commands in queue order
///
/// Pending commands are drained before the worker exits on shutdown.
pub fn spawn_dispatch_worker<D: ActionDispatcher + Sync + 'static>(
    dispatcher: Arc<D>,
    mut command_rx: mpsc::UnboundedReceiver<NavCommand>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    trace!("Delivering {}", command.label());
                    deliver(dispatcher.as_ref(), command).await;
                }
                _ = shutdown_rx.changed() => {
                    while let Ok(command) = command_rx.try_recv() {
                        deliver(dispatcher.as_ref(), command).await;
                    }
                    break;
                }
            }
        }
        debug!("Dispatcher worker stopped");
    })
}

/// Deliver a haptic pulse after [`HAPTIC_DELAY`], detached from the queue
fn spawn_haptic<D: ActionDispatcher + Sync + 'static>(dispatcher: Arc<D>, duration_ms: u32) {
    tokio::spawn(async move {
        tokio::time::sleep(HAPTIC_DELAY).await;
        dispatcher.request_haptic(duration_ms).await;
    });
}

/// Re-read the config file off the event loop and post the result
fn spawn_config_reload(path: PathBuf, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || config::try_load_settings(&path)).await;
        match result {
            Ok(Ok(settings)) => {
                let _ = msg_tx.send(Message::ConfigReloaded(Box::new(settings))).await;
            }
            Ok(Err(e)) if e.is_recoverable() => {
                warn!("Config reload failed, keeping previous: {}", e)
            }
            Ok(Err(e)) => error!("Config reload failed: {}", e),
            Err(e) => warn!("Config reload task failed: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Dispatched, RecordingDispatcher};
    use crate::timer::TimerId;
    use swipenav_core::KeyCode;

    fn context(
        config_path: Option<PathBuf>,
    ) -> (
        ActionContext<RecordingDispatcher>,
        Arc<RecordingDispatcher>,
        mpsc::Receiver<Message>,
        mpsc::UnboundedReceiver<NavCommand>,
    ) {
        let recorder = Arc::new(RecordingDispatcher::new());
        let (msg_tx, msg_rx) = mpsc::channel(16);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let ctx = ActionContext::new(recorder.clone(), msg_tx, command_tx, config_path);
        (ctx, recorder, msg_rx, command_rx)
    }

    #[tokio::test]
    async fn test_dispatch_queues_command_and_reports_event() {
        let (mut ctx, _recorder, _msg_rx, mut command_rx) = context(None);

        let event = handle_action(
            UpdateAction::Dispatch(NavCommand::inject(KeyCode::BACK)),
            &mut ctx,
        );

        assert_eq!(
            event,
            Some(EngineEvent::CommandDispatched {
                command: NavCommand::inject(KeyCode::BACK)
            })
        );
        assert_eq!(
            command_rx.try_recv().unwrap(),
            NavCommand::inject(KeyCode::BACK)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_haptic_delivered_after_delay() {
        let (mut ctx, recorder, _msg_rx, _command_rx) = context(None);

        let event = handle_action(UpdateAction::Haptic { duration_ms: 50 }, &mut ctx);
        assert_eq!(event, Some(EngineEvent::HapticRequested { duration_ms: 50 }));

        tokio::task::yield_now().await;
        assert!(recorder.calls().is_empty());

        tokio::time::sleep(HAPTIC_DELAY + Duration::from_millis(1)).await;
        assert_eq!(recorder.calls(), vec![Dispatched::Haptic(50)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_and_cancel_go_to_scheduler() {
        let (mut ctx, _recorder, _msg_rx, _command_rx) = context(None);

        let event = handle_action(
            UpdateAction::ScheduleTimer {
                timer: TimerId::LongPress,
                delay: Duration::from_millis(300),
            },
            &mut ctx,
        );
        assert!(event.is_none());
        assert!(ctx.scheduler.is_pending(TimerId::LongPress));

        handle_action(UpdateAction::CancelTimer(TimerId::LongPress), &mut ctx);
        assert!(!ctx.scheduler.is_pending(TimerId::LongPress));
    }

    #[tokio::test]
    async fn test_reload_without_path_is_noop() {
        let (mut ctx, _recorder, mut msg_rx, _command_rx) = context(None);

        assert!(handle_action(UpdateAction::ReloadConfig, &mut ctx).is_none());
        tokio::task::yield_now().await;
        assert!(msg_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reload_posts_config_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gesture]\ntrigger_timeout_ms = 450\n").unwrap();

        let (mut ctx, _recorder, mut msg_rx, _command_rx) = context(Some(path));
        handle_action(UpdateAction::ReloadConfig, &mut ctx);

        let msg = tokio::time::timeout(Duration::from_secs(2), msg_rx.recv())
            .await
            .expect("reload timed out")
            .expect("channel closed");
        match msg {
            Message::ConfigReloaded(settings) => {
                assert_eq!(settings.gesture.trigger_timeout_ms, 450);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reload_of_broken_file_posts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gesture\nbroken").unwrap();

        let (mut ctx, _recorder, mut msg_rx, _command_rx) = context(Some(path));
        handle_action(UpdateAction::ReloadConfig, &mut ctx);

        let result = tokio::time::timeout(Duration::from_millis(200), msg_rx.recv()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_worker_preserves_order() {
        let recorder = Arc::new(RecordingDispatcher::new());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = spawn_dispatch_worker(recorder.clone(), command_rx, shutdown_rx);

        command_tx.send(NavCommand::DismissInputMethod).unwrap();
        command_tx.send(NavCommand::inject(KeyCode::HOME)).unwrap();
        let _ = shutdown_tx.send(true);
        worker.await.unwrap();

        assert_eq!(
            recorder.commands(),
            vec![
                NavCommand::DismissInputMethod,
                NavCommand::inject(KeyCode::HOME)
            ]
        );
    }
}
