//! Headless mode runner - main event loop
//!
//! Feeds pointer events into the engine either from a gesture script
//! (replayed in real time) or from NDJSON lines on stdin, and writes every
//! engine event to stdout.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use swipenav_app::config::{self, Settings};
use swipenav_app::services::{ActionDispatcher, CommandDispatcher, LogDispatcher};
use swipenav_app::{Engine, EngineEvent, Message};
use swipenav_core::prelude::*;
use swipenav_core::PointerEvent;

use super::script::GestureScript;
use super::HeadlessEvent;

/// What to run and where its configuration lives
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Config file; also the file watched with `watch`
    pub config_path: Option<PathBuf>,
    /// Reload the config file when it changes
    pub watch: bool,
    /// Gesture script to replay; stdin when absent
    pub script: Option<PathBuf>,
}

/// Input feeding the engine
enum Input {
    Script(GestureScript),
    Stdin,
}

/// Run in headless mode - output JSON events to stdout
pub async fn run_headless(options: RunOptions) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("swipenav starting in HEADLESS mode");
    if let Some(path) = &options.config_path {
        info!("Config: {}", path.display());
    }
    info!("═══════════════════════════════════════════════════════");

    let mut settings = match &options.config_path {
        Some(path) => config::load_settings(path),
        None => {
            let mut settings = Settings::default();
            config::apply_env_overrides(&mut settings);
            settings
        }
    };

    let input = match &options.script {
        Some(path) => {
            let script = GestureScript::load(path)?;
            if let Some(display) = script.display {
                settings.display = display;
            }
            Input::Script(script)
        }
        None => Input::Stdin,
    };

    if settings.commands.is_empty() {
        run_with_dispatcher(settings, Arc::new(LogDispatcher), options, input).await
    } else {
        let dispatcher = Arc::new(CommandDispatcher::new(settings.commands.clone()));
        run_with_dispatcher(settings, dispatcher, options, input).await
    }
}

async fn run_with_dispatcher<D: ActionDispatcher + Sync + 'static>(
    settings: Settings,
    dispatcher: Arc<D>,
    options: RunOptions,
    input: Input,
) -> Result<()> {
    // Create engine (handles all shared initialization)
    let mut engine = Engine::new(settings, dispatcher, options.config_path.clone());

    if options.watch {
        if let Err(e) = engine.start_config_watcher() {
            warn!("Config watching disabled: {}", e);
            HeadlessEvent::from_error(&e).emit();
        }
    }

    let printer = spawn_event_printer(engine.subscribe());
    let timeout_ms = engine.state.config.trigger_timeout_ms;

    match input {
        Input::Script(script) => {
            if script.keyguard_showing {
                engine.process_message(Message::KeyguardChanged { showing: true });
            }
            spawn_script_feeder(script, timeout_ms, engine.msg_sender());
        }
        Input::Stdin => {
            let stdin_tx = engine.msg_sender();
            let grace = Duration::from_millis(timeout_ms + 100);
            std::thread::spawn(move || {
                spawn_stdin_reader_blocking(stdin_tx, grace);
            });
        }
    }

    let result = headless_event_loop(&mut engine).await;

    engine.shutdown().await;
    if let Err(e) = printer.await {
        warn!("Event printer failed: {}", e);
    }

    info!("swipenav headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<D: ActionDispatcher + Sync + 'static>(
    engine: &mut Engine<D>,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        if !engine.process_next().await {
            info!("Message channel closed");
            break;
        }
    }

    Ok(())
}

/// Write engine events to stdout until shutdown
fn spawn_event_printer(mut rx: broadcast::Receiver<EngineEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    HeadlessEvent::from(&event).emit();
                    if matches!(event, EngineEvent::Shutdown) {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event printer lagged, {} events dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Replay script events at their recorded offsets, then quit
fn spawn_script_feeder(script: GestureScript, timeout_ms: u64, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let start = Instant::now();
        let end_ms = script.end_time_ms(timeout_ms);

        for event in script.events {
            tokio::time::sleep_until(start + Duration::from_millis(event.event_time_ms)).await;
            if msg_tx.send(Message::Pointer(event)).await.is_err() {
                return;
            }
        }

        tokio::time::sleep_until(start + Duration::from_millis(end_ms)).await;
        info!("Script finished after {}ms", end_ms);
        let _ = msg_tx.send(Message::Quit).await;
    });
}

/// A parsed stdin line
#[derive(Debug, Clone, PartialEq)]
enum StdinCommand {
    Pointer(PointerEvent),
    Keyguard(bool),
    Quit,
    Empty,
}

fn parse_stdin_line(line: &str) -> Result<StdinCommand> {
    let trimmed = line.trim();
    match trimmed {
        "" => Ok(StdinCommand::Empty),
        "q" | "quit" => Ok(StdinCommand::Quit),
        "keyguard on" => Ok(StdinCommand::Keyguard(true)),
        "keyguard off" => Ok(StdinCommand::Keyguard(false)),
        _ => Ok(StdinCommand::Pointer(serde_json::from_str(trimmed)?)),
    }
}

/// Read stdin lines and forward them to the message channel (blocking version)
///
/// On EOF the engine gets `grace` to let pending timers fire before quitting.
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>, grace: Duration) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let msg = match parse_stdin_line(&line) {
            Ok(StdinCommand::Pointer(event)) => Message::Pointer(event),
            Ok(StdinCommand::Keyguard(showing)) => Message::KeyguardChanged { showing },
            Ok(StdinCommand::Quit) => {
                info!("Stdin: quit requested");
                let _ = msg_tx.blocking_send(Message::Quit);
                return;
            }
            Ok(StdinCommand::Empty) => continue,
            Err(e) => {
                warn!("Ignoring stdin line {:?}: {}", line, e);
                HeadlessEvent::error(format!("invalid input: {}", e), false).emit();
                continue;
            }
        };

        if msg_tx.blocking_send(msg).is_err() {
            return;
        }
    }

    info!("Stdin closed");
    std::thread::sleep(grace);
    let _ = msg_tx.blocking_send(Message::Quit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipenav_core::PointerAction;

    #[test]
    fn test_parse_pointer_line() {
        let cmd = parse_stdin_line(r#"{"action":"move","x":540,"y":2100,"t_ms":40}"#).unwrap();
        match cmd {
            StdinCommand::Pointer(event) => {
                assert_eq!(event.action, PointerAction::Move);
                assert_eq!(event.raw_y, 2100.0);
                assert_eq!(event.event_time_ms, 40);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_control_lines() {
        assert_eq!(parse_stdin_line("quit").unwrap(), StdinCommand::Quit);
        assert_eq!(parse_stdin_line("  q ").unwrap(), StdinCommand::Quit);
        assert_eq!(
            parse_stdin_line("keyguard on").unwrap(),
            StdinCommand::Keyguard(true)
        );
        assert_eq!(
            parse_stdin_line("keyguard off").unwrap(),
            StdinCommand::Keyguard(false)
        );
        assert_eq!(parse_stdin_line("").unwrap(), StdinCommand::Empty);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = parse_stdin_line("swipe up please").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_feeder_paces_events_and_quits() {
        let script = GestureScript::parse(
            r#"
[[event]]
action = "down"
x = 540
y = 2155
t_ms = 0

[[event]]
action = "up"
x = 540
y = 2000
t_ms = 200
"#,
        )
        .unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let start = Instant::now();
        spawn_script_feeder(script, 300, tx);

        assert!(matches!(rx.recv().await, Some(Message::Pointer(_))));
        assert!(matches!(rx.recv().await, Some(Message::Pointer(_))));
        assert!(start.elapsed() >= Duration::from_millis(200));

        assert!(matches!(rx.recv().await, Some(Message::Quit)));
        assert!(start.elapsed() >= Duration::from_millis(600));
    }
}
