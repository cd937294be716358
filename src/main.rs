use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use futures::future::join_all;
use tracing::error;
use tracing_subscriber::EnvFilter;

use preflight::adapters::{SystemResolver, TcpConnector, TcpProber, TracingSink};
use preflight::{ConnectionGate, GateError, PreflightConfig};

#[derive(Parser, Debug)]
#[command(version = env!("PREFLIGHT_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Check that network serial ports are reachable before connecting to them")]
pub struct Opts {
    /// Configuration file, defaults to the per-user preflight config
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Also print the detailed debug channel
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured ports that are network addresses
    List,
    /// Run the preflight checks against one address
    Check {
        address: String,
        #[command(flatten)]
        attempt: AttemptArgs,
    },
    /// Run the preflight checks against every configured network port, concurrently
    CheckAll {
        #[command(flatten)]
        attempt: AttemptArgs,
    },
    /// Run the preflight checks, then open the connection once and close it
    Connect {
        address: String,
        #[command(flatten)]
        attempt: AttemptArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct AttemptArgs {
    /// Baud rate passed through to the connector
    #[arg(long, short = 'b', default_value_t = 115200)]
    baudrate: u32,

    /// Connection timeout in seconds; the preflight stages are capped separately
    #[arg(long, short = 't', default_value_t = 10.0, allow_negative_numbers = true)]
    timeout: f64,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "preflight=debug"
    } else {
        "preflight=info,preflight::debug=off"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

/// Print the verdict for one address, returns false on a real failure.
fn print_verdict(address: &str, result: Result<(), GateError>) -> bool {
    match result {
        Ok(()) => {
            println!("{}: ok", address);
            true
        }
        Err(GateError::NotNetworkAddress) => {
            println!("{}: skipped, not a network address", address);
            true
        }
        Err(e) => {
            println!("{}: {} ({})", address, e, e.remedy());
            false
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    let config = match PreflightConfig::load(opts.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let gate = ConnectionGate::new(
        config,
        Arc::new(SystemResolver::new()),
        Arc::new(TcpProber::new()),
        Arc::new(TracingSink::new()),
    );

    let ok = match opts.command {
        Command::List => {
            for candidate in gate.candidates() {
                println!("{}", candidate);
            }
            true
        }
        Command::Check { address, attempt } => {
            let result = gate.authorize(&address, attempt.baudrate, attempt.timeout).await;
            print_verdict(&address, result.map(|_| ()))
        }
        Command::CheckAll { attempt } => {
            let candidates = gate.candidates();
            let results = join_all(
                candidates
                    .iter()
                    .map(|candidate| gate.authorize(candidate, attempt.baudrate, attempt.timeout)),
            )
            .await;
            candidates
                .iter()
                .zip(results)
                .map(|(candidate, result)| print_verdict(candidate, result.map(|_| ())))
                .fold(true, |all_ok, ok| all_ok && ok)
        }
        Command::Connect { address, attempt } => {
            let result = gate
                .connect(&TcpConnector::new(), &address, attempt.baudrate, attempt.timeout)
                .await;
            print_verdict(&address, result.map(drop))
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
