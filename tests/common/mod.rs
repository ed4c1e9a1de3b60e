//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use claim_relayer::blockchain::{BlockchainResult, ChainReader, TransactionReceipt, Wallet};
use claim_relayer::config::{HttpConfig, RelayerServiceConfig};
use claim_relayer::http::HttpServer;
use claim_relayer::relayer::RpcRelayer;
use claim_relayer::smart_wallet::{SmartWallet, WaitSettings, WalletContext};
use claim_relayer::{ClaimOrchestrator, Shutdown};

pub const CHAIN_ID: u64 = 80001;
pub const MINED_BLOCK: u64 = 10;

/// Well-known development key; never funded on a real network.
pub const SERVER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn claim_contract() -> Address {
    Address::repeat_byte(0xc1)
}

pub fn mined_tx_hash() -> TxHash {
    TxHash::repeat_byte(0xab)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Relayer backend that records every submission it receives.
#[derive(Clone)]
pub struct MockRelayer {
    pub url: String,
    fee_options: Value,
    submissions: Arc<Mutex<Vec<Value>>>,
    outcome: RelayOutcome,
}

/// What the relayer reports once asked for a receipt.
#[derive(Debug, Clone, Copy)]
pub struct RelayOutcome {
    /// Relayer status string, e.g. `SUCCEEDED`.
    pub status: &'static str,
    /// Whether the receipt embeds the on-chain transaction.
    pub mined: bool,
}

impl RelayOutcome {
    pub const SUCCEEDED: Self = Self {
        status: "SUCCEEDED",
        mined: true,
    };
}

impl MockRelayer {
    /// Bodies of every `SendMetaTxn` call so far.
    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().unwrap().clone()
    }
}

async fn handle_fee_options(State(relayer): State<MockRelayer>, Json(_body): Json<Value>) -> Json<Value> {
    Json(relayer.fee_options.clone())
}

async fn handle_send_meta_txn(State(relayer): State<MockRelayer>, Json(body): Json<Value>) -> Json<Value> {
    let mut submissions = relayer.submissions.lock().unwrap();
    submissions.push(body);
    Json(json!({ "status": true, "txnHash": format!("meta-{}", submissions.len()) }))
}

async fn handle_meta_txn_receipt(State(relayer): State<MockRelayer>, Json(body): Json<Value>) -> Json<Value> {
    let outcome = relayer.outcome;
    let embedded = if outcome.mined {
        json!({ "transactionHash": mined_tx_hash() }).to_string()
    } else {
        String::new()
    };
    let revert_reason = match outcome.status {
        "FAILED" | "PARTIALLY_FAILED" | "DROPPED" => json!("execution reverted"),
        _ => Value::Null,
    };
    Json(json!({
        "receipt": {
            "id": body["metaTxID"],
            "status": outcome.status,
            "revertReason": revert_reason,
            "txnReceipt": embedded,
        }
    }))
}

/// Start a relayer backend answering fee requests with `fee_options`.
pub async fn start_mock_relayer(fee_options: Value) -> MockRelayer {
    start_mock_relayer_with(fee_options, RelayOutcome::SUCCEEDED).await
}

/// Start a relayer backend that settles every submission as `outcome`.
pub async fn start_mock_relayer_with(fee_options: Value, outcome: RelayOutcome) -> MockRelayer {
    let mut relayer = MockRelayer {
        url: String::new(),
        fee_options,
        submissions: Arc::new(Mutex::new(Vec::new())),
        outcome,
    };

    let router = Router::new()
        .route("/rpc/Relayer/FeeOptions", post(handle_fee_options))
        .route("/rpc/Relayer/SendMetaTxn", post(handle_send_meta_txn))
        .route("/rpc/Relayer/GetMetaTxnReceipt", post(handle_meta_txn_receipt))
        .with_state(relayer.clone());

    relayer.url = format!("http://{}", serve(router).await);
    relayer
}

/// Start an indexer backend reporting `balance_wei` for every account.
pub async fn start_mock_indexer(balance_wei: &'static str) -> String {
    let router = Router::new().route(
        "/rpc/Indexer/GetEtherBalance",
        post(move |Json(body): Json<Value>| async move {
            Json(json!({
                "balance": {
                    "accountAddress": body["accountAddress"],
                    "balanceWei": balance_wei,
                }
            }))
        }),
    );
    format!("http://{}", serve(router).await)
}

/// Chain holding the wallet at nonce 0 whose transactions mine with `receipt_status`.
pub struct MockChain {
    pub receipt_status: u64,
    pub deployed: bool,
}

#[async_trait]
impl ChainReader for MockChain {
    fn chain_id(&self) -> u64 {
        CHAIN_ID
    }

    async fn get_code(&self, _address: Address) -> BlockchainResult<Bytes> {
        if self.deployed {
            Ok(Bytes::from_static(&[0x60, 0x80]))
        } else {
            Ok(Bytes::new())
        }
    }

    async fn call(&self, _to: Address, _data: Bytes) -> BlockchainResult<Bytes> {
        // Calls into an address without code return nothing.
        if self.deployed {
            Ok(U256::ZERO.abi_encode().into())
        } else {
            Ok(Bytes::new())
        }
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        Ok(MINED_BLOCK)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        Ok(Some(TransactionReceipt {
            transaction_hash: tx_hash,
            status: self.receipt_status,
            block_number: Some(MINED_BLOCK),
        }))
    }
}

pub fn server_wallet() -> SmartWallet {
    let signer = Wallet::from_private_key(SERVER_KEY, CHAIN_ID).unwrap();
    SmartWallet::single_owner(signer, WalletContext::default())
}

/// A running claim relayer. Dropping it stops the server.
pub struct TestServer {
    pub url: String,
    pub wallet_address: Address,
    _shutdown: Shutdown,
}

/// Start the claim relayer against `relayer` and a chain mining with `receipt_status`.
pub async fn start_server(relayer: &MockRelayer, receipt_status: u64, http: HttpConfig) -> TestServer {
    let chain = MockChain {
        receipt_status,
        deployed: true,
    };
    start_server_with(relayer, chain, http, Duration::from_secs(5)).await
}

/// Start the claim relayer on `chain`, giving up on confirmation after `wait_limit`.
pub async fn start_server_with(
    relayer: &MockRelayer,
    chain: MockChain,
    http: HttpConfig,
    wait_limit: Duration,
) -> TestServer {
    let rpc = RpcRelayer::new(&RelayerServiceConfig {
        url: relayer.url.clone(),
        request_timeout_secs: 5,
        ..Default::default()
    })
    .unwrap();

    let settings = WaitSettings {
        relayer_poll: Duration::from_millis(10),
        receipt_poll: Duration::from_millis(10),
        confirmations: 1,
        timeout: Some(wait_limit),
    };

    let wallet = server_wallet();
    let wallet_address = wallet.get_address();
    let bound = wallet.connect(Arc::new(chain), Arc::new(rpc), settings);
    let orchestrator = Arc::new(ClaimOrchestrator::new(bound, claim_contract(), "MATIC"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(http, orchestrator);
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        url: format!("http://{}", addr),
        wallet_address,
        _shutdown: shutdown,
    }
}

/// Fee options offering `symbol` at `value`, with a quote.
pub fn fee_offer(symbol: &str, value: &str, fee_recipient: Address) -> Value {
    json!({
        "options": [{
            "token": { "symbol": symbol, "name": symbol, "decimals": 18 },
            "to": fee_recipient,
            "value": value,
            "gasLimit": "50000",
        }],
        "quote": "quote-1",
        "sponsored": false,
    })
}
