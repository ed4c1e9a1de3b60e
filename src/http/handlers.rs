//! Route handlers.

use alloy::primitives::Address;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::claim::{ClaimRequest, NonceInput, RelayError};
use crate::http::response::reply;
use crate::http::server::AppState;
use crate::observability::metrics;

/// JSON body of `POST /transaction`.
///
/// Missing fields are tolerated here and reported as encoding failures by
/// the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionBody {
    /// Accepted for compatibility; not used.
    pub eth_auth_proof_string: Option<serde_json::Value>,
    pub session_wallet: String,
    pub sequence_wallet: String,
    pub nonce: Option<NonceInput>,
    pub sig: String,
}

impl From<TransactionBody> for ClaimRequest {
    fn from(body: TransactionBody) -> Self {
        ClaimRequest {
            session_wallet: body.session_wallet,
            sequence_wallet: body.sequence_wallet,
            nonce: body.nonce,
            signature: body.sig,
        }
    }
}

/// Relay a claim and report the transaction hash.
pub async fn submit_transaction(
    State(state): State<AppState>,
    body: Result<Json<TransactionBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        // Well-formed JSON with a wrongly typed field fails like any other
        // unencodable input.
        Err(JsonRejection::JsonDataError(e)) => {
            let err = RelayError::Encoding(e.body_text());
            tracing::error!(error = %err, kind = err.kind(), "Claim relay failed");
            metrics::record_request("/transaction", 500);
            return reply(Err(err), state.http.strict_status_codes);
        }
        Err(rejection) => return rejection.into_response(),
    };

    if body.eth_auth_proof_string.is_some() {
        tracing::debug!("Ignoring ethAuthProofString");
    }

    let request = ClaimRequest::from(body);
    let result = state
        .orchestrator
        .execute_tx(&request)
        .await
        .map(|outcome| outcome.transaction_hash);

    metrics::record_request("/transaction", if result.is_ok() { 200 } else { 500 });
    reply(result, state.http.strict_status_codes)
}

/// Liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub wallet_address: Address,
    pub chain_id: u64,
}

/// Report that the server is up and which wallet it relays from.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let wallet = state.orchestrator.wallet();
    Json(HealthStatus {
        status: "operational".to_string(),
        version: crate::VERSION.to_string(),
        wallet_address: wallet.get_address(),
        chain_id: wallet.chain_id(),
    })
}
