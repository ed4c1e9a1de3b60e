//! Reply bodies for the transaction endpoint.
//!
//! The wire contract reports success or failure in the body's `status`
//! field while the transport status stays 200. Strict mode maps failures
//! to real HTTP status codes instead.

use alloy::primitives::TxHash;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::claim::RelayError;

/// Body of a `POST /transaction` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionReply {
    Success { tx: TxHash, status: u16 },
    Failure { msg: String, status: u16, kind: String },
}

impl TransactionReply {
    pub fn success(tx: TxHash) -> Self {
        TransactionReply::Success { tx, status: 200 }
    }

    pub fn failure(err: &RelayError) -> Self {
        TransactionReply::Failure {
            msg: err.to_string(),
            status: 500,
            kind: err.kind().to_string(),
        }
    }
}

/// Transport status for a failed relay in strict mode.
pub fn http_status(err: &RelayError) -> StatusCode {
    match err {
        RelayError::Encoding(_) => StatusCode::BAD_REQUEST,
        RelayError::Network(_) | RelayError::Relayer(_) => StatusCode::BAD_GATEWAY,
        RelayError::Reverted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RelayError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Build the HTTP response for a relay result.
pub fn reply(result: Result<TxHash, RelayError>, strict_status_codes: bool) -> Response {
    match result {
        Ok(tx) => (StatusCode::OK, Json(TransactionReply::success(tx))).into_response(),
        Err(err) => {
            let status = if strict_status_codes {
                http_status(&err)
            } else {
                StatusCode::OK
            };
            (status, Json(TransactionReply::failure(&err))).into_response()
        }
    }
}
