#![warn(clippy::all, rust_2018_idioms)]

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;

use cwlr::app::cli::{Cli, Command};
use cwlr::app::config::CwlrConfig;
use cwlr::app::data_plane::cloudwatch_logs::{
    CloudWatchLogsClient, LogRetrieval, Paginator, RetrievalError,
};
use cwlr::app::prompt::{PromptActivity, PromptError, TerminalSelector};
use cwlr::app::render::EventRenderer;
use cwlr::app::Commands;
use cwlr::{trace_error, trace_info, trace_warn};

/// Exit status after an interrupt, as a shell reports SIGINT
const INTERRUPTED: u8 = 130;

/// AWS SDK and HTTP crates are chatty at debug level
const QUIET_DEPENDENCIES: &str =
    "aws_config=warn,aws_sigv4=warn,aws_smithy_runtime=warn,aws_smithy_runtime_api=warn,hyper=warn";

fn log_dir() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "", "cwlr").map(|dirs| dirs.data_dir().join("logs"))
}

fn init_logging(verbose: u8) {
    let Some(log_dir) = log_dir() else {
        return;
    };
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Logging disabled, cannot create {:?}: {}", log_dir, e);
        return;
    }

    let log_path = log_dir.join("cwlr.log");

    let file = match std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {:?}: {}", log_path, e);
            return;
        }
    };

    // Owner read/write only; events can carry sensitive payloads
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = file.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&log_path, perms) {
                eprintln!("[SECURITY] Failed to set log file permissions: {}", e);
            }
        }
    }

    let crate_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default_directives = format!("cwlr={crate_level},{QUIET_DEPENDENCIES}");

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::builder().parse(&default_directives))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cwlr=info"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false), // No ANSI colors in file
    );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    trace_info!("Logging initialized to: {:?}", log_path);
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let crash_msg = format!(
            "cwlr crashed!\n\
             Panic occurred at: {}\n\
             Details: {}\n\
             Backtrace:\n{:?}\n",
            panic_info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown location".to_string()),
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
                .unwrap_or("unknown panic"),
            std::backtrace::Backtrace::force_capture()
        );

        eprintln!("\n{}", crash_msg);

        if let Some(log_dir) = log_dir() {
            let _ = std::fs::create_dir_all(&log_dir);
            let crash_log_path = log_dir.join("crash.log");

            if let Ok(mut file) = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&crash_log_path)
            {
                use std::io::Write;
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "\n=== CRASH at {} ===\n{}", timestamp, crash_msg);
                eprintln!("Crash log written to: {:?}", crash_log_path);
            }
        }
    }));
}

/// Ctrl-C at a prompt exits. During pagination the first Ctrl-C stops at the next page
/// boundary and the second exits.
fn spawn_interrupt_watcher(cancel: CancellationToken, prompt: PromptActivity) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        if prompt.is_waiting() {
            trace_info!("Interrupt received at a prompt, exiting");
            eprintln!();
            std::process::exit(i32::from(INTERRUPTED));
        }
        trace_warn!("Interrupt received, cancelling pagination");
        eprintln!("\nCancelling after the current page, press Ctrl-C again to exit");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(INTERRUPTED));
        }
    });
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CwlrConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    let cancel = CancellationToken::new();
    let prompt_activity = PromptActivity::new();
    spawn_interrupt_watcher(cancel.clone(), prompt_activity.clone());

    let client = CloudWatchLogsClient::from_settings(&config.aws).await;
    let paginator = Paginator::new()
        .with_cancellation(cancel)
        .with_retry(config.pagination.retry_policy())
        .with_page_timeout(config.pagination.page_timeout())
        .with_max_pages(config.pagination.max_pages);
    let retrieval = LogRetrieval::with_paginator(Arc::new(client), paginator);

    let stdout = std::io::stdout();
    let color = config.display.color && stdout.is_terminal();
    let renderer = EventRenderer::new(color, cli.utc);

    // Prompts go to stderr so stdout carries only results
    let selector = TerminalSelector::new(
        std::io::stdin().lock(),
        std::io::stderr(),
        config.display.clone(),
    )
    .with_activity(prompt_activity);

    let mut commands = Commands::new(
        retrieval,
        selector,
        stdout.lock(),
        renderer,
        config.display.group_by_service,
    );

    match &cli.command {
        Command::Read(args) => commands.read(args).await,
        Command::Search(args) => commands.search(args).await,
        Command::Groups { json } => commands.groups(*json).await,
    }
}

fn main() -> ExitCode {
    setup_panic_handler();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    trace_info!("cwlr starting: {:?}", cli.command);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if matches!(err.downcast_ref::<PromptError>(), Some(PromptError::Aborted))
                || matches!(
                    err.downcast_ref::<RetrievalError>(),
                    Some(RetrievalError::Cancelled { .. })
                )
            {
                trace_info!("Stopped by user: {}", err);
                return ExitCode::from(INTERRUPTED);
            }

            trace_error!("Command failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
