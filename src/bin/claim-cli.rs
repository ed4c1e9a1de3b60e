use alloy::primitives::{hex, Address, U256};
use clap::Parser;
use serde_json::{json, Value};

use claim_relayer::blockchain::Wallet;
use claim_relayer::claim::sign_claim;

#[derive(Parser)]
#[command(name = "claim-cli")]
#[command(about = "Sign a claim with $pkey and submit it to a claim relayer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    server: String,

    /// Wallet the claim is credited to
    #[arg(long)]
    sequence_wallet: Address,

    /// Claim nonce (decimal or 0x-prefixed hex)
    #[arg(short, long, default_value = "0")]
    nonce: U256,

    /// Chain id the signing key is bound to
    #[arg(long, default_value_t = 80001)]
    chain_id: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let session_key = Wallet::from_env(cli.chain_id)?;
    let signature = sign_claim(&session_key, cli.sequence_wallet, cli.nonce).await?;

    let body = json!({
        "sig": hex::encode_prefixed(signature.as_bytes()),
        "sessionWallet": session_key.address(),
        "sequenceWallet": cli.sequence_wallet,
        "nonce": cli.nonce.to_string(),
    });

    let res = reqwest::Client::new()
        .post(format!("{}/transaction", cli.server.trim_end_matches('/')))
        .json(&body)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relayer returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
