//! Meta-transaction relayer integration.
//!
//! # Data Flow
//! ```text
//! BoundWallet (encoded wallet call)
//!     → fee_options (what the relayer wants to be paid)
//!     → send_meta_txn (dispatch, optionally with a fee quote)
//!     → meta_txn_receipt (poll until the relayer reports an outcome)
//! ```
//!
//! Calls are never retried here; a transport failure surfaces immediately.

pub mod rpc;
pub mod types;

use async_trait::async_trait;

use crate::smart_wallet::MetaCall;

pub use rpc::RpcRelayer;
pub use types::{
    FeeOption, FeeOptions, FeeQuote, FeeToken, MetaTxnId, MetaTxnReceipt, MetaTxnStatus,
    RelayerError, RelayerResult,
};

/// Service that pays gas for wallet calls and is reimbursed by a fee option.
#[async_trait]
pub trait Relayer: Send + Sync {
    /// Ask which payments the relayer accepts for dispatching `call`.
    async fn fee_options(&self, call: &MetaCall) -> RelayerResult<FeeOptions>;

    /// Submit a signed call. `quote` must accompany a batch that pays a fee.
    async fn send_meta_txn(
        &self,
        call: &MetaCall,
        quote: Option<&FeeQuote>,
    ) -> RelayerResult<MetaTxnId>;

    /// Current receipt of a submitted call, `None` if the relayer has none yet.
    async fn meta_txn_receipt(&self, id: &MetaTxnId) -> RelayerResult<Option<MetaTxnReceipt>>;
}
