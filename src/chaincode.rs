use tracing::{info, warn};

use crate::donation;
use crate::error::{LedgerError, Result};
use crate::index::Index;
use crate::records::RecordStore;
use crate::state::KeyValueStore;
use crate::types::{Donation, DonationIds};

/// Entry point for invocations routed by operation name.
pub struct Ledger<S> {
    state: S,
    index: Index,
}

impl<S: KeyValueStore> Ledger<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            index: Index::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn records(&self) -> RecordStore<'_, S> {
        RecordStore::new(&self.state)
    }

    /// Initializes the index only when it has never been written.
    pub fn bootstrap(&self) -> Result<()> {
        if self.index.exists(&self.state)? {
            info!("donation index already present");
            return Ok(());
        }
        self.initialize()
    }

    /// Unconditionally resets the index to empty.
    pub fn initialize(&self) -> Result<()> {
        self.index.initialize(&self.state)
    }

    pub fn create_donation(&self, args: &[String]) -> Result<Donation> {
        donation::create_donation(&self.state, &self.index, args)
    }

    pub fn donation_ids(&self) -> Result<Vec<String>> {
        self.index.ids(&self.state)
    }

    pub fn donations_by_owner(&self, owner: &str) -> Result<Vec<String>> {
        self.index.list_by_owner(&self.records(), owner)
    }

    /// Mutating operations. Succeeding invocations return no payload.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        info!(function, "invoke");
        match function {
            "init" => self.initialize()?,
            "createDonation" => {
                self.create_donation(args)?;
            }
            _ => {
                warn!(function, "invoke did not find function");
                return Err(LedgerError::UnknownOperation(function.to_string()));
            }
        }
        Ok(Vec::new())
    }

    /// Read-only operations. Every query takes exactly one argument.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let [arg] = args else {
            return Err(LedgerError::Argument {
                expected: 1,
                got: args.len(),
            });
        };
        match function {
            "getAllDonationsByUserId" => encode(&DonationIds {
                donations: self.donations_by_owner(arg)?,
            }),
            _ => {
                warn!(function, "query did not find function");
                Err(LedgerError::UnknownOperation(function.to_string()))
            }
        }
    }
}

fn encode(ids: &DonationIds) -> Result<Vec<u8>> {
    serde_json::to_vec(ids).map_err(|e| LedgerError::Store(format!("encoding query result: {e}")))
}
