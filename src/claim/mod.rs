//! Claim relaying: the request model, the relay workflow, and its errors.

pub mod error;
pub mod orchestrator;
pub mod request;

pub use error::{RelayError, RelayResult};
pub use orchestrator::{select_fee, ClaimOrchestrator, ClaimOutcome, FeePath, FeeSelection};
pub use request::{claim_digest, sign_claim, ClaimRequest, NonceInput, PreparedTransaction};
