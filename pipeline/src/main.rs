use std::path::PathBuf;
use std::process::ExitCode;

use checkin_pipeline::commands;
use checkin_pipeline_commons::env::load_env;
use checkin_pipeline_commons::telemetry::{init_telemetry_from_env, init_telemetry_from_env_with_log_file};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "checkin")]
#[command(about = "Multi-wallet check-in CLI to run batches, check balances, and fund wallets.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // Runs the check-in batch over every configured wallet
    Run {
        // Private key file, one key per line. Defaults to config/private_keys.txt.
        #[arg(long)]
        keys_file: Option<PathBuf>,
        // Proxy list assigned to wallets by position. Defaults to config/proxies.txt.
        #[arg(long)]
        proxies_file: Option<PathBuf>,
        // Delay between wallets in milliseconds. Overrides CHECKIN_PACING_MS.
        #[arg(long)]
        delay_ms: Option<u64>,
        // Optional local log file; logs go to stdout when omitted.
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    // Shows every wallet's address and native balance
    Balance,

    // Sends native funds from one of the configured keys
    Send {
        // Recipient address
        #[arg(long)]
        to: String,
        // Amount in native units, e.g. "0.25"
        #[arg(long)]
        amount: String,
        // 1-based position of the sending key in the key file
        #[arg(long, default_value_t = 1)]
        key_index: usize,
        // Optional gas price override in wei
        #[arg(long)]
        gas_price_wei: Option<u128>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env();
    let cli = Cli::parse();

    let _telemetry_guard = match &cli.command {
        Commands::Run { log_file, .. } => {
            let mut telemetry_log_file = log_file.clone();
            if let Some(path) = telemetry_log_file.as_deref()
                && let Err(err) = ensure_log_file_parent_exists(path)
            {
                eprintln!(
                    "Warning: cannot create log-file parent for {}: {err}. Falling back to stdout logs.",
                    path.display()
                );
                telemetry_log_file = None;
            }

            match init_telemetry_from_env_with_log_file(telemetry_log_file.as_deref()) {
                Ok(guard) => guard,
                Err(err) => {
                    if let Some(path) = telemetry_log_file.as_deref() {
                        eprintln!(
                            "Failed to initialize telemetry with log file {}: {err}. Falling back to stdout logs.",
                            path.display()
                        );
                        match init_telemetry_from_env_with_log_file(None) {
                            Ok(guard) => guard,
                            Err(stdout_err) => {
                                eprintln!("Failed to initialize telemetry fallback: {stdout_err}");
                                return ExitCode::FAILURE;
                            }
                        }
                    } else {
                        eprintln!("Failed to initialize telemetry: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
        _ => match init_telemetry_from_env() {
            Ok(guard) => guard,
            Err(err) => {
                eprintln!("Failed to initialize telemetry: {err}");
                return ExitCode::FAILURE;
            }
        },
    };

    match cli.command {
        Commands::Run {
            keys_file,
            proxies_file,
            delay_ms,
            ..
        } => {
            if let Err(err) = commands::run_batch::run_checkin_batch(keys_file, proxies_file, delay_ms).await {
                eprintln!("Check-in batch failed: {}", err);
                return ExitCode::FAILURE;
            }
        }
        Commands::Balance => {
            if let Err(err) = commands::balances::balances().await {
                eprintln!("Balance check failed: {}", err);
                return ExitCode::FAILURE;
            }
        }
        Commands::Send {
            to,
            amount,
            key_index,
            gas_price_wei,
        } => {
            if let Err(err) = commands::send::send(&to, &amount, key_index, gas_price_wei).await {
                eprintln!("Send failed: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn ensure_log_file_parent_exists(path: &std::path::Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
