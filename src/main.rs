//! swipenav - Edge-swipe navigation gesture recognizer
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use swipenav::headless::HeadlessEvent;
use swipenav::RunOptions;
use swipenav_app::config;

/// swipenav - turn edge swipes into Back, Home and Recents
#[derive(Parser, Debug)]
#[command(name = "swipenav")]
#[command(about = "Edge-swipe navigation gesture recognizer", long_about = None)]
struct Args {
    /// Gesture script to replay (reads NDJSON pointer events from stdin if omitted)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reload the config file when it changes
    #[arg(long)]
    watch: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    swipenav_core::logging::init()?;

    let args = Args::parse();
    let config_path = args.config.or_else(config::default_config_path);

    if args.init_config {
        let Some(path) = config_path else {
            eprintln!("❌ No config directory available; pass --config PATH");
            std::process::exit(1);
        };
        config::init_config_file(&path)?;
        eprintln!("✅ Config written to {}", path.display());
        return Ok(());
    }

    let result = swipenav::run_headless(RunOptions {
        config_path,
        watch: args.watch,
        script: args.script,
    })
    .await;

    if let Err(e) = result {
        HeadlessEvent::from_error(&e).emit();
        return Err(e.into());
    }

    Ok(())
}
