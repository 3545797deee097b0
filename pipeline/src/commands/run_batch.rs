use indicatif::{ProgressBar, ProgressStyle};
use prettytable::{Cell, Row, Table, format};
use std::{
    io::{IsTerminal, stderr, stdout},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

use checkin_pipeline_core::units::format_gwei;

use crate::{
    batch::{BatchRunner, LiveWalletRunner, seed_wallets},
    config::{Config, load_credentials, load_proxy_lines},
    error::PipelineResult,
    outcome::{BatchSummary, CheckinOutcome},
    stage::PipelineStage,
    stages::export::ExportStage,
};

// Prints the startup banner.
fn print_banner() {
    println!(
        r#"
 ██████╗██╗  ██╗███████╗ ██████╗██╗  ██╗      ██╗███╗   ██╗
██╔════╝██║  ██║██╔════╝██╔════╝██║ ██╔╝      ██║████╗  ██║
██║     ███████║█████╗  ██║     █████╔╝ █████╗██║██╔██╗ ██║
██║     ██╔══██║██╔══╝  ██║     ██╔═██╗ ╚════╝██║██║╚██╗██║
╚██████╗██║  ██║███████╗╚██████╗██║  ██╗      ██║██║ ╚████║
 ╚═════╝╚═╝  ╚═╝╚══════╝ ╚═════╝╚═╝  ╚═╝      ╚═╝╚═╝  ╚═══╝

          Wallet Check-in Engine
"#
    );
}

fn print_startup_table(config: &Config, wallet_count: usize, proxy_count: usize, pacing_delay: Duration) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![Cell::new("Startup Configuration")]));

    table.add_row(Row::new(vec![Cell::new("Network"), Cell::new(&config.chain.name)]));
    table.add_row(Row::new(vec![
        Cell::new("Chain ID"),
        Cell::new(&config.chain.chain_id.to_string()),
    ]));
    table.add_row(Row::new(vec![Cell::new("RPC"), Cell::new(&config.chain.rpc_url)]));
    table.add_row(Row::new(vec![
        Cell::new("Check-in Contract"),
        Cell::new(&config.contract_address.to_string()),
    ]));
    table.add_row(Row::new(vec![Cell::new("Portal"), Cell::new(&config.portal_base_url)]));
    table.add_row(Row::new(vec![
        Cell::new("Wallets"),
        Cell::new(&wallet_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Proxies"),
        Cell::new(&proxy_count.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Pacing (ms)"),
        Cell::new(&pacing_delay.as_millis().to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Gas Price"),
        Cell::new(&format!("{} gwei", format_gwei(config.gas_price_wei))),
    ]));
    table.add_row(Row::new(vec![Cell::new("Export"), Cell::new(&config.export_path)]));

    table.printstd();
}

fn console_ui_enabled() -> bool {
    is_console_ui_enabled(cfg!(feature = "plain-logs"), stdout().is_terminal(), stderr().is_terminal())
}

fn is_console_ui_enabled(plain_logs_feature_enabled: bool, stdout_is_tty: bool, stderr_is_tty: bool) -> bool {
    !plain_logs_feature_enabled && stdout_is_tty && stderr_is_tty
}

fn start_spinner(enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

fn log_batch_results(config: &Config, results: &[CheckinOutcome]) {
    let success_count = results.iter().filter(|r| r.status.is_success()).count();

    info!(
        outcome_count = results.len(),
        success_count,
        failed_count = results.len() - success_count,
        "Check-in outcomes recorded"
    );

    for r in results {
        let explorer_url = r
            .tx_hash
            .as_deref()
            .map(|tx| config.chain.explorer_tx_url(tx))
            .unwrap_or_else(|| "n/a".to_string());

        info!(
            event = "checkin_outcome",
            wallet = %r.wallet_id,
            address = %r.formatted_address(),
            balance = %r.formatted_balance(),
            tx_hash = %r.formatted_tx(),
            explorer_url = %explorer_url,
            duration_secs = %r.formatted_duration(),
            status = %r.status.description(),
            error = %r.error.as_deref().unwrap_or("-"),
            warnings = %r.formatted_warnings(),
            "Check-in outcome"
        );
    }
}

pub fn print_batch_results(config: &Config, results: &[CheckinOutcome]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Wallet"),
        Cell::new("Address"),
        Cell::new(&format!("Balance ({})", config.chain.symbol)),
        Cell::new("Tx"),
        Cell::new("Block"),
        Cell::new("Gas"),
        Cell::new("Duration (s)"),
        Cell::new("Status"),
        Cell::new("Notes"),
    ]));

    for r in results {
        let status_cell = if r.status.is_success() {
            Cell::new(r.status.description()).style_spec("Fg")
        } else {
            Cell::new(r.status.description()).style_spec("Fr")
        };

        let notes = match (&r.error, r.warnings.is_empty()) {
            (Some(error), _) => error.clone(),
            (None, false) => r.formatted_warnings(),
            (None, true) => "-".to_string(),
        };

        table.add_row(Row::new(vec![
            Cell::new(&r.wallet_id),
            Cell::new(&r.formatted_address()),
            Cell::new(&r.formatted_balance()),
            Cell::new(&r.formatted_tx()),
            Cell::new(&r.block_number.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(&r.gas_used.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(&r.formatted_duration()),
            status_cell,
            Cell::new(&notes),
        ]));
    }

    table.printstd();
}

fn print_summary(summary: &BatchSummary) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![Cell::new("Batch Summary")]));

    table.add_row(Row::new(vec![Cell::new("Wallets"), Cell::new(&summary.total.to_string())]));
    table.add_row(Row::new(vec![
        Cell::new("Succeeded"),
        Cell::new(&summary.succeeded.to_string()).style_spec("Fg"),
    ]));
    let failed_cell = if summary.failed > 0 {
        Cell::new(&summary.failed.to_string()).style_spec("Fr")
    } else {
        Cell::new(&summary.failed.to_string())
    };
    table.add_row(Row::new(vec![Cell::new("Failed"), failed_cell]));
    table.add_row(Row::new(vec![
        Cell::new("Success Rate"),
        Cell::new(&summary.formatted_success_rate()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Total Duration (s)"),
        Cell::new(&format!("{:.2}", summary.total_duration_secs)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Mean Duration (s)"),
        Cell::new(&format!("{:.2}", summary.mean_duration_secs)),
    ]));

    table.printstd();
}

pub async fn run_checkin_batch(
    keys_file: Option<PathBuf>,
    proxies_file: Option<PathBuf>,
    delay_ms: Option<u64>,
) -> PipelineResult<()> {
    let ui_enabled = console_ui_enabled();
    if ui_enabled {
        print_banner();
    }

    let config = Config::load()?;
    let keys_path = keys_file.unwrap_or_else(|| config.keys_path.clone());
    let proxies_path = proxies_file.unwrap_or_else(|| config.proxies_path.clone());
    let pacing_delay = Duration::from_millis(delay_ms.unwrap_or(config.pacing_delay_ms));

    let credentials = load_credentials(&keys_path)?;
    let proxy_lines = load_proxy_lines(&proxies_path)?;
    let seeds = seed_wallets(&credentials, &proxy_lines);

    if ui_enabled {
        print_startup_table(&config, seeds.len(), proxy_lines.len(), pacing_delay);
    }
    info!(
        network = %config.chain.name,
        chain_id = config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        contract = %config.contract_address,
        portal = %config.portal_base_url,
        wallet_count = seeds.len(),
        proxy_count = proxy_lines.len(),
        pacing_delay_ms = pacing_delay.as_millis() as u64,
        gas_price_gwei = %format_gwei(config.gas_price_wei),
        "Startup configuration"
    );
    info!("Check-in batch started; processing {} wallets...", seeds.len());

    let spinner = start_spinner(ui_enabled);
    if let Some(s) = spinner.as_ref() {
        s.set_message("Running wallet check-ins...");
    }

    let runner = BatchRunner::new(LiveWalletRunner::new(config.clone()), pacing_delay);
    let outcomes = runner.process(&seeds).await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let exporter = ExportStage {
        path: config.export_path.clone(),
    };
    if let Err(err) = exporter.process(&outcomes).await {
        warn!("Failed to export results: {}", err);
    }

    log_batch_results(&config, &outcomes);
    if ui_enabled {
        print_batch_results(&config, &outcomes);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        success_rate = %summary.formatted_success_rate(),
        total_duration_secs = summary.total_duration_secs,
        "Batch complete"
    );
    for (index, reason) in &summary.failures {
        warn!(wallet_index = index, "Wallet failed: {}", reason);
    }
    if ui_enabled {
        print_summary(&summary);
    }

    Ok(())
}
