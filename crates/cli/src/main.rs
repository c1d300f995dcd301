//! `capsolver` command-line client.
//!
//! This binary is the composition root: it parses flags, installs the
//! `tracing-subscriber` layer every crate in the workspace logs through,
//! builds the HTTP transport and the [`Solver`], and ties Ctrl-C to a
//! [`CancellationToken`] so an in-flight solve stops at its next wait or
//! exchange.
//!
//! ```text
//! capsolver solve --type AntiTurnstileTaskProxyLess --task task.json
//! echo '{"websiteURL":"...","websiteKey":"..."}' | capsolver solve --type ReCaptchaV2TaskProxyLess
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use protocol::{ClientKey, SolverConfig, TaskType, DEFAULT_BASE_URL, DEFAULT_MAX_POLLS};
use serde_json::{Map, Value};
use solver::Solver;
use tasks::RawTask;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use transport::{HttpTransport, DEFAULT_REQUEST_TIMEOUT};

/// Solve captchas with the CapSolver API
#[derive(Debug, Parser)]
#[command(name = "capsolver")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CapSolver client key
    #[arg(long, env = "CAPSOLVER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API base URL
    #[arg(long, env = "CAPSOLVER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit a task and wait for its solution
    ///
    /// The solution payload is printed to stdout as JSON.
    Solve {
        /// Task type discriminator, e.g. ReCaptchaV2TaskProxyLess
        #[arg(long = "type")]
        task_type: String,

        /// File holding the task fields as a JSON object; `-` or absent reads stdin
        #[arg(long)]
        task: Option<PathBuf>,

        /// Maximum number of result polls
        #[arg(long, default_value_t = DEFAULT_MAX_POLLS)]
        max_polls: u32,

        /// Seconds to wait before each poll
        #[arg(long, default_value_t = 3)]
        poll_interval_secs: u64,

        /// Per-request HTTP timeout in seconds
        #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
        request_timeout_secs: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let client_key = ClientKey::new(cli.api_key).context("API key must not be empty")?;

    match cli.command {
        Commands::Solve {
            task_type,
            task,
            max_polls,
            poll_interval_secs,
            request_timeout_secs,
        } => {
            let task_type = TaskType::new(task_type).context("task type must not be empty")?;
            let fields = read_task_fields(task.as_deref())?;
            let task = RawTask::new(task_type, fields);

            let config = SolverConfig::default()
                .with_base_url(cli.base_url)
                .with_max_polls(max_polls)
                .with_poll_interval(Duration::from_secs(poll_interval_secs));
            let transport = HttpTransport::new(Duration::from_secs(request_timeout_secs))
                .context("failed to build HTTP transport")?;
            let solver = Solver::new(Arc::new(transport), client_key, config);

            let cancel = CancellationToken::new();
            tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

            let solution = solver
                .solve_until(&task, &cancel)
                .await
                .context("solve failed")?;
            info!("solution received");
            println!("{}", serde_json::to_string_pretty(&solution)?);
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("received Ctrl-C, cancelling");
            cancel.cancel();
        }
        Err(e) => warn!(error = %e, "failed to install Ctrl-C handler"),
    }
}

fn read_task_fields(path: Option<&std::path::Path>) -> Result<Map<String, Value>> {
    let text = match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read task file {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read task from stdin")?;
            buf
        }
    };
    parse_task_fields(&text)
}

fn parse_task_fields(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text).context("task is not valid JSON")? {
        Value::Object(fields) => Ok(fields),
        other => bail!("task must be a JSON object, got {other}"),
    }
}
