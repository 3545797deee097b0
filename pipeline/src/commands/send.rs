use checkin_pipeline_core::units::{format_native, parse_native};
use evm_wallet_client::{Address, ExecuteOpts};

use crate::{
    batch::{connect_seed_client, seed_wallets},
    config::{Config, load_credentials, load_proxy_lines},
    error::PipelineResult,
};

/// Funds a wallet (or anyone else) from one of the configured keys. Used to
/// top up gas before a batch; goes through the sender's proxy like any other
/// traffic from that wallet.
pub async fn send(to: &str, amount: &str, key_index: usize, gas_price_wei: Option<u128>) -> PipelineResult<()> {
    let config = Config::load()?;
    let credentials = load_credentials(&config.keys_path)?;
    let proxy_lines = load_proxy_lines(&config.proxies_path)?;
    let seeds = seed_wallets(&credentials, &proxy_lines);

    if key_index == 0 || key_index > seeds.len() {
        return Err(format!("key index {key_index} out of range (1..={})", seeds.len()).into());
    }
    let seed = &seeds[key_index - 1];

    let to_address = to
        .parse::<Address>()
        .map_err(|e| format!("invalid recipient address: {e}"))?;
    let amount_wei = parse_native(amount)?;

    let client = connect_seed_client(&config, seed).await?;
    let connection = client
        .connection_info()
        .await
        .map_err(|e| format!("balance read failed: {e}"))?;

    println!(
        "Sending {} {} from {} (holds {} {})",
        format_native(amount_wei),
        config.chain.symbol,
        connection.address,
        format_native(connection.balance_wei),
        config.chain.symbol,
    );

    let opts = ExecuteOpts {
        gas_price_wei,
        ..ExecuteOpts::default()
    };
    let confirmation = client
        .send_native(to_address, amount_wei, opts)
        .await
        .map_err(|e| format!("transfer failed: {e}"))?;

    println!(
        "Confirmed in block {} (gas used {})",
        confirmation.block_number, confirmation.gas_used
    );
    println!("{}", config.chain.explorer_tx_url(&confirmation.tx_hash));

    Ok(())
}
