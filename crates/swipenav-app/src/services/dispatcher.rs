//! System-navigation effects
//!
//! This module provides the ActionDispatcher trait for everything the
//! recognizer asks the platform to do. All operations are fire-and-forget:
//! failures are logged by the adapter and never reach the state machine.

use std::process::Stdio;

use swipenav_core::prelude::*;
use swipenav_core::{KeyCode, NavCommand};
use tokio::process::Command;

use crate::config::CommandSettings;

/// Navigation side effects requested by the state machine
#[trait_variant::make(ActionDispatcher: Send)]
pub trait LocalActionDispatcher {
    /// Inject a key press (down + up) for `code`
    async fn inject_key(&self, code: KeyCode);

    /// Open or close the recent-apps overview
    async fn toggle_recents(&self);

    /// Warm up the recent-apps overview ahead of a likely toggle
    async fn preload_recents(&self);

    /// Discard a preload that will not be used
    async fn cancel_preload_recents(&self);

    /// Switch to the previously used app
    async fn toggle_last_app(&self);

    /// Hide the soft keyboard before going home
    async fn dismiss_input_method(&self);

    /// Vibrate for `duration_ms`
    async fn request_haptic(&self, duration_ms: u32);
}

/// Route a [`NavCommand`] to the matching dispatcher call
pub async fn deliver<D: ActionDispatcher + Sync>(dispatcher: &D, command: NavCommand) {
    match command {
        NavCommand::InjectKey { code } => dispatcher.inject_key(code).await,
        NavCommand::ToggleRecents => dispatcher.toggle_recents().await,
        NavCommand::PreloadRecents => dispatcher.preload_recents().await,
        NavCommand::CancelPreloadRecents => dispatcher.cancel_preload_recents().await,
        NavCommand::ToggleLastApp => dispatcher.toggle_last_app().await,
        NavCommand::DismissInputMethod => dispatcher.dismiss_input_method().await,
    }
}

// ─────────────────────────────────────────────────────────────────
// LogDispatcher
// ─────────────────────────────────────────────────────────────────

/// Dispatcher that only logs; used when no commands are configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

impl ActionDispatcher for LogDispatcher {
    async fn inject_key(&self, code: KeyCode) {
        info!("inject key {}", code);
    }

    async fn toggle_recents(&self) {
        info!("toggle recents");
    }

    async fn preload_recents(&self) {
        info!("preload recents");
    }

    async fn cancel_preload_recents(&self) {
        info!("cancel preload recents");
    }

    async fn toggle_last_app(&self) {
        info!("toggle last app");
    }

    async fn dismiss_input_method(&self) {
        info!("dismiss input method");
    }

    async fn request_haptic(&self, duration_ms: u32) {
        info!("haptic {}ms", duration_ms);
    }
}

// ─────────────────────────────────────────────────────────────────
// CommandDispatcher
// ─────────────────────────────────────────────────────────────────

/// Dispatcher that runs shell templates from the `[commands]` section
///
/// Each template is run through `sh -c` after substituting `{code}` and
/// `{duration_ms}`. Unset templates are skipped.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    commands: CommandSettings,
}

impl CommandDispatcher {
    pub fn new(commands: CommandSettings) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &CommandSettings {
        &self.commands
    }

    async fn run(&self, name: &str, template: Option<&str>, vars: TemplateVars) {
        let Some(template) = template else {
            debug!("No command configured for {}", name);
            return;
        };

        let line = render_template(template, vars);
        debug!("Running {} command: {}", name, line);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                trace!("{} command finished", name);
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                debug!(
                    "{} command exited with {}: {}",
                    name,
                    output.status,
                    stderr.trim()
                );
            }
            Err(e) => {
                warn!("Failed to spawn {} command `{}`: {}", name, line, e);
            }
        }
    }
}

impl ActionDispatcher for CommandDispatcher {
    async fn inject_key(&self, code: KeyCode) {
        let vars = TemplateVars {
            code: Some(code),
            ..TemplateVars::default()
        };
        self.run("inject_key", self.commands.inject_key.as_deref(), vars)
            .await;
    }

    async fn toggle_recents(&self) {
        let vars = TemplateVars {
            code: Some(KeyCode::APP_SWITCH),
            ..TemplateVars::default()
        };
        self.run("toggle_recents", self.commands.toggle_recents.as_deref(), vars)
            .await;
    }

    async fn preload_recents(&self) {
        self.run(
            "preload_recents",
            self.commands.preload_recents.as_deref(),
            TemplateVars::default(),
        )
        .await;
    }

    async fn cancel_preload_recents(&self) {
        self.run(
            "cancel_preload_recents",
            self.commands.cancel_preload_recents.as_deref(),
            TemplateVars::default(),
        )
        .await;
    }

    async fn toggle_last_app(&self) {
        self.run(
            "toggle_last_app",
            self.commands.toggle_last_app.as_deref(),
            TemplateVars::default(),
        )
        .await;
    }

    async fn dismiss_input_method(&self) {
        self.run(
            "dismiss_input_method",
            self.commands.dismiss_input_method.as_deref(),
            TemplateVars::default(),
        )
        .await;
    }

    async fn request_haptic(&self, duration_ms: u32) {
        let vars = TemplateVars {
            duration_ms: Some(duration_ms),
            ..TemplateVars::default()
        };
        self.run("haptic", self.commands.haptic.as_deref(), vars)
            .await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TemplateVars {
    code: Option<KeyCode>,
    duration_ms: Option<u32>,
}

/// Substitute `{code}` and `{duration_ms}`; unknown placeholders are left as-is
fn render_template(template: &str, vars: TemplateVars) -> String {
    let mut line = template.to_string();
    if let Some(code) = vars.code {
        line = line.replace("{code}", &code.code().to_string());
    }
    if let Some(duration_ms) = vars.duration_ms {
        line = line.replace("{duration_ms}", &duration_ms.to_string());
    }
    line
}

// ─────────────────────────────────────────────────────────────────
// Test utilities
// ─────────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils {
    use std::sync::Mutex;

    use super::*;

    /// One recorded dispatcher call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Dispatched {
        Command(NavCommand),
        Haptic(u32),
    }

    /// Dispatcher that records every call in order
    #[derive(Debug, Default)]
    pub struct RecordingDispatcher {
        calls: Mutex<Vec<Dispatched>>,
    }

    impl RecordingDispatcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call, in delivery order
        pub fn calls(&self) -> Vec<Dispatched> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// Navigation commands only, in delivery order
        pub fn commands(&self) -> Vec<NavCommand> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Dispatched::Command(command) => Some(command),
                    Dispatched::Haptic(_) => None,
                })
                .collect()
        }

        /// Haptic durations, in delivery order
        pub fn haptics(&self) -> Vec<u32> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Dispatched::Haptic(duration_ms) => Some(duration_ms),
                    Dispatched::Command(_) => None,
                })
                .collect()
        }

        pub fn clear(&self) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.clear();
            }
        }

        fn record(&self, call: Dispatched) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }
    }

    impl ActionDispatcher for RecordingDispatcher {
        async fn inject_key(&self, code: KeyCode) {
            self.record(Dispatched::Command(NavCommand::inject(code)));
        }

        async fn toggle_recents(&self) {
            self.record(Dispatched::Command(NavCommand::ToggleRecents));
        }

        async fn preload_recents(&self) {
            self.record(Dispatched::Command(NavCommand::PreloadRecents));
        }

        async fn cancel_preload_recents(&self) {
            self.record(Dispatched::Command(NavCommand::CancelPreloadRecents));
        }

        async fn toggle_last_app(&self) {
            self.record(Dispatched::Command(NavCommand::ToggleLastApp));
        }

        async fn dismiss_input_method(&self) {
            self.record(Dispatched::Command(NavCommand::DismissInputMethod));
        }

        async fn request_haptic(&self, duration_ms: u32) {
            self.record(Dispatched::Haptic(duration_ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::test_utils::{Dispatched, RecordingDispatcher};
    use super::{
        deliver, render_template, ActionDispatcher, CommandDispatcher, LogDispatcher,
        TemplateVars,
    };
    use crate::config::CommandSettings;
    use swipenav_core::{KeyCode, NavCommand};
    use tracing::Level;

    /// Log sink for asserting on what an adapter wrote
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(level: Level) -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[test]
    fn test_render_template_substitutes_code() {
        let vars = TemplateVars {
            code: Some(KeyCode::APP_SWITCH),
            duration_ms: None,
        };
        assert_eq!(
            render_template("input keyevent {code}", vars),
            "input keyevent 187"
        );
    }

    #[test]
    fn test_render_template_substitutes_duration() {
        let vars = TemplateVars {
            code: None,
            duration_ms: Some(50),
        };
        assert_eq!(
            render_template("vibrate -d {duration_ms} # {code}", vars),
            "vibrate -d 50 # {code}"
        );
    }

    #[tokio::test]
    async fn test_deliver_routes_every_command() {
        let recorder = RecordingDispatcher::new();
        let commands = [
            NavCommand::DismissInputMethod,
            NavCommand::inject(KeyCode::HOME),
            NavCommand::PreloadRecents,
            NavCommand::CancelPreloadRecents,
            NavCommand::ToggleRecents,
            NavCommand::ToggleLastApp,
        ];

        for command in commands {
            deliver(&recorder, command).await;
        }

        assert_eq!(recorder.commands(), commands.to_vec());
        assert!(recorder.haptics().is_empty());
    }

    #[tokio::test]
    async fn test_recording_dispatcher_clear() {
        let recorder = RecordingDispatcher::new();
        recorder.request_haptic(50).await;
        assert_eq!(recorder.calls(), vec![Dispatched::Haptic(50)]);

        recorder.clear();
        assert!(recorder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_log_dispatcher_does_not_panic() {
        let dispatcher = LogDispatcher;
        deliver(&dispatcher, NavCommand::inject(KeyCode::BACK)).await;
        dispatcher.request_haptic(0).await;
    }

    #[tokio::test]
    async fn test_command_dispatcher_unset_template_is_noop() {
        let dispatcher = CommandDispatcher::new(CommandSettings::default());
        assert!(dispatcher.commands().is_empty());
        dispatcher.toggle_recents().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_dispatcher_runs_template() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("keys.txt");

        let dispatcher = CommandDispatcher::new(CommandSettings {
            inject_key: Some(format!("echo key {{code}} >> {}", out.display())),
            haptic: Some(format!("echo haptic {{duration_ms}} >> {}", out.display())),
            toggle_recents: Some(format!("echo key {{code}} >> {}", out.display())),
            ..CommandSettings::default()
        });

        dispatcher.inject_key(KeyCode::BACK).await;
        dispatcher.request_haptic(25).await;
        dispatcher.toggle_recents().await;

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content, "key 4\nhaptic 25\nkey 187\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_dispatcher_failure_is_swallowed() {
        let dispatcher = CommandDispatcher::new(CommandSettings {
            toggle_last_app: Some("exit 3".to_string()),
            ..CommandSettings::default()
        });

        // Logged, not surfaced
        dispatcher.toggle_last_app().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_failure_logged_at_debug_only() {
        let dispatcher = CommandDispatcher::new(CommandSettings {
            toggle_recents: Some("echo busy >&2; exit 3".to_string()),
            ..CommandSettings::default()
        });

        {
            let (logs, _guard) = capture_logs(Level::INFO);
            dispatcher.toggle_recents().await;
            assert!(logs.contents().is_empty(), "{}", logs.contents());
        }

        let (logs, _guard) = capture_logs(Level::DEBUG);
        dispatcher.toggle_recents().await;
        let output = logs.contents();
        assert!(output.contains("toggle_recents command exited with"));
        assert!(output.contains("busy"));
    }
}
