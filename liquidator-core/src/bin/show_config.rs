use liquidator_core::{LiquidatorConfig, NetworkRegistry};

fn main() {
    liquidator_core::init();

    let config = match LiquidatorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let endpoints = match config.endpoint_set() {
        Ok(endpoints) => endpoints,
        Err(e) => {
            eprintln!("Invalid endpoint configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Liquidator Configuration:\n");
    println!("  Data directory: {}", config.data_dir.display());
    println!("  Wallet RPC URL: {}", config.wallet_rpc_url);
    println!("  Portfolio API URL: {}", config.portfolio_api_url);
    println!(
        "  Portfolio API key: {}",
        if config.portfolio_api_key.is_some() { "(set)" } else { "(not set)" }
    );
    let timeouts = &config.timeouts;
    println!("  Probe timeout: {}ms", timeouts.probe_ms);
    println!("  Call timeout: {}ms (retry after {}ms)", timeouts.call_ms, timeouts.retry_delay_ms);
    println!(
        "  Monitor: first poll after {}ms, every {}ms, {} attempts",
        timeouts.monitor_initial_delay_ms, timeouts.monitor_poll_interval_ms, timeouts.monitor_max_attempts
    );

    println!("\nNetworks:\n");
    for network in NetworkRegistry::all() {
        let candidates = endpoints.candidates(network.chain_id);
        println!(
            "  {:>10} {:<24} {}",
            network.chain_id,
            network.display_name,
            if candidates.is_empty() { "(no endpoints)".to_string() } else { candidates.join(", ") }
        );
    }
}
