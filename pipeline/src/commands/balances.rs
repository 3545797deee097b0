use std::sync::Arc;

use futures::future::join_all;
use prettytable::{Cell, Row, Table, format};

use checkin_pipeline_core::units::format_native;
use evm_wallet_client::U256;

use crate::{
    batch::{WalletSeed, connect_seed_client, seed_wallets},
    config::{Config, load_credentials, load_proxy_lines},
    error::PipelineResult,
};

/// Resolves every configured wallet's address and native balance, through its
/// assigned proxy. Read-only; nothing touches the portal or signs anything.
pub async fn balances() -> PipelineResult<()> {
    let config = Config::load()?;
    let credentials = load_credentials(&config.keys_path)?;
    let proxy_lines = load_proxy_lines(&config.proxies_path)?;
    let seeds = seed_wallets(&credentials, &proxy_lines);

    let results = read_balances(&config, &seeds).await;

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Wallet"),
        Cell::new("Address"),
        Cell::new(&format!("Balance ({})", config.chain.symbol)),
    ]));

    println!("\n=== Wallet balances ({}) ===\n", config.chain.name);

    for (seed, result) in seeds.iter().zip(results) {
        match result {
            Ok((address, balance_wei)) => table.add_row(Row::new(vec![
                Cell::new(&seed.wallet_id),
                Cell::new(&address),
                Cell::new(&format_native(balance_wei)),
            ])),
            Err(e) => table.add_row(Row::new(vec![
                Cell::new(&seed.wallet_id),
                Cell::new("error"),
                Cell::new(&e),
            ])),
        };
    }
    table.printstd();

    Ok(())
}

async fn read_balances(config: &Arc<Config>, seeds: &[WalletSeed]) -> Vec<Result<(String, U256), String>> {
    let futs = seeds.iter().cloned().map(|seed| {
        let config = config.clone();

        tokio::spawn(async move {
            let client = connect_seed_client(&config, &seed)
                .await
                .map_err(|e| e.to_string())?;
            let connection = client
                .connection_info()
                .await
                .map_err(|e| format!("balance read failed: {e}"))?;
            Ok::<_, String>((connection.address.to_string(), connection.balance_wei))
        })
    });

    join_all(futs)
        .await
        .into_iter()
        .map(|j| j.map_err(|e| e.to_string()).and_then(|x| x))
        .collect()
}
