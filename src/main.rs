use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vcdctl::cli::Cli;
use vcdctl::commands;
use vcdctl::error::VcdError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // Requests are awaited one after another; only the network detail
    // fan-out runs concurrently, so a small pool is plenty.
    let num_cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    let worker_threads = std::cmp::min(num_cpus, 4);
    debug!("Configuring Tokio runtime with {} worker threads", worker_threads);

    let runtime = match Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to create Tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// `--debug` wins over `RUST_LOG`; without either only warnings are shown.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("vcdctl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<VcdError>())
        .map(|e| e.exit_code())
        .unwrap_or(1) as u8
}
