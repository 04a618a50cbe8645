//! Donation records over a per-key state store.
//!
//! Each donation is stored under its own id with its transaction history
//! embedded; the `allDonations` key lists every id in creation order.

pub mod chaincode;
pub mod config;
pub mod donation;
pub mod error;
pub mod handlers;
pub mod index;
pub mod records;
pub mod state;
pub mod types;

pub use chaincode::Ledger;
pub use error::{LedgerError, Result};
pub use state::{KeyValueStore, MemoryState, SqliteState};
