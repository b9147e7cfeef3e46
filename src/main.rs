//! touch-replay - play a recorded touch script through the recognizer
//!
//! Usage: `touch-replay <script.json> [config.toml]`
//!
//! Prints every recognized gesture as one JSON line, followed by a summary.
//! Set `RUST_LOG=touchgesture=debug` to follow the state machine.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use touchgesture::config::{self, GestureConfig};
use touchgesture::{GestureRecorder, TouchInputDispatcher, TouchScript};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting touch-replay v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args_os().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        bail!("usage: touch-replay <script.json> [config.toml]");
    };

    let config = match args.next().map(PathBuf::from) {
        Some(path) => config::load_config(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let path = config::default_config_path();
            if path.exists() {
                config::load_config(&path)
                    .with_context(|| format!("loading config {}", path.display()))?
            } else {
                GestureConfig::default()
            }
        }
    };

    let script = TouchScript::load(&script_path)
        .with_context(|| format!("loading script {}", script_path.display()))?;

    let dispatcher = TouchInputDispatcher::with_config(config);
    let recorder = GestureRecorder::new();
    dispatcher.register_handler(Box::new(recorder.clone()));

    let summary = script.play(&dispatcher);

    for event in recorder.events().iter().filter(|e| e.is_gesture()) {
        println!("{}", serde_json::to_string(event)?);
    }
    println!(
        "{}: {} gestures, {} callbacks, {}",
        script.name.as_deref().unwrap_or("script"),
        recorder.count(|e| e.is_gesture()),
        recorder.len(),
        summary
    );

    Ok(())
}
