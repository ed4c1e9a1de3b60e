//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Load key → Connect chain/relayer → Bind listener
//!     → report wallet address and balance (in the background)
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → stop accepting → drain → exit
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::{shutdown_signal, Shutdown};
pub use startup::{report_wallet, FundingStatus};
