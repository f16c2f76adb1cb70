//! Scribe entrypoint: replay an event script against an editing session.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_model::SessionOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;
mod script;

use runtime::{ConfiguredPlatform, ReplayRuntime};

#[derive(Parser, Debug)]
#[command(name = "scribe", version, about = "Replay editor events through the Scribe core")]
struct Args {
    /// Script to replay. Read from stdin when omitted.
    pub script: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `scribe.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Text the surface shows at session start (becomes the history floor).
    #[arg(long = "initial")]
    pub initial: Option<String>,
    /// Print `{content, historySize, highlightCallCount}` as JSON after the log.
    #[arg(long = "state-json")]
    pub state_json: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("scribe.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "scribe.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

async fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("reading script {}", p.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("reading script from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    let options = SessionOptions {
        chord_timeout: config.chord_timeout(),
        highlight_delay: config.highlight_delay(),
    };
    let platform = ConfiguredPlatform::from_preference(config.primary_modifier());

    let source = read_script(args.script.as_deref()).await?;
    let steps = script::parse_script(&source)?;
    info!(
        target: "runtime.startup",
        steps = steps.len(),
        config_override = args.config.is_some(),
        chord_timeout_ms = options.chord_timeout.as_millis() as u64,
        highlight_delay_ms = options.highlight_delay.as_millis() as u64,
        "bootstrap_complete"
    );

    let mut runtime = ReplayRuntime::start(steps, options, platform, args.initial.clone())?;
    runtime.run().await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in runtime.log_lines() {
        writeln!(out, "{line}")?;
    }
    if args.state_json {
        writeln!(out, "{}", serde_json::to_string(&runtime.report())?)?;
    }
    out.flush()?;
    Ok(())
}
