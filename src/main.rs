//! Claim relayer (v1)
//!
//! Accepts signed claims over HTTP and relays them to the claim contract.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌────────────────────────────────────────────────────┐
//!                     │                   CLAIM RELAYER                    │
//!                     │                                                    │
//!  POST /transaction  │  ┌────────┐    ┌──────────────┐    ┌────────────┐  │
//!  ───────────────────┼─▶│  http  │───▶│    claim     │───▶│   smart    │  │
//!                     │  │ server │    │ orchestrator │    │   wallet   │  │
//!                     │  └────────┘    └──────────────┘    └─────┬──────┘  │
//!                     │                                          │         │
//!                     │                         ┌────────────────┼───────┐ │
//!                     │                         ▼                ▼       │ │
//!                     │                   ┌──────────┐     ┌──────────┐  │ │
//!  {tx, status}       │                   │ relayer  │     │blockchain│  │ │
//!  ◀──────────────────┼───────────────────│   rpc    │     │  reader  │  │ │
//!                     │                   └────┬─────┘     └────┬─────┘  │ │
//!                     └────────────────────────┼────────────────┼────────┘ │
//!                                              ▼                ▼
//!                                     meta-tx relayer      JSON-RPC node
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use claim_relayer::blockchain::{BlockchainClient, Wallet};
use claim_relayer::config::load_from_env;
use claim_relayer::http::HttpServer;
use claim_relayer::indexer::IndexerClient;
use claim_relayer::lifecycle::{report_wallet, Shutdown};
use claim_relayer::observability::{logging, metrics};
use claim_relayer::relayer::RpcRelayer;
use claim_relayer::smart_wallet::{SmartWallet, WaitSettings};
use claim_relayer::ClaimOrchestrator;

#[derive(Parser)]
#[command(name = "claim-relayer")]
#[command(about = "Relays signed claims through a smart-contract wallet", long_about = None)]
struct Args {
    /// Path to a TOML config file (defaults to $RELAYER_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_from_env(args.config.as_deref())?;
    logging::init_tracing(&config.observability.log_filter);

    tracing::info!(version = claim_relayer::VERSION, "claim-relayer starting");
    tracing::info!(
        chain_id = config.blockchain.chain_id,
        relayer_url = %config.relayer.url,
        claim_contract = %config.claim.contract_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let signer = match Wallet::from_env(config.blockchain.chain_id) {
        Ok(signer) => signer,
        Err(e) => {
            tracing::error!(error = %e, "Cannot load the relaying key");
            return Err(e.into());
        }
    };

    let chain = Arc::new(BlockchainClient::new(config.blockchain.clone()).await?);
    let relayer = Arc::new(RpcRelayer::new(&config.relayer)?);
    let indexer = IndexerClient::new(&config.indexer)?;

    let wallet = SmartWallet::single_owner(signer, config.wallet.clone());
    let bound = wallet
        .clone()
        .connect(chain, relayer, WaitSettings::from_config(&config));
    let orchestrator = Arc::new(ClaimOrchestrator::new(
        bound,
        config.claim.contract_address,
        config.relayer.native_token_symbol.clone(),
    ));

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(port = config.listener.port, "listening on port {}", config.listener.port);

    tokio::spawn(async move {
        report_wallet(&wallet, &indexer).await;
    });

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.http.clone(), orchestrator);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
