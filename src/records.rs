use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::state::KeyValueStore;
use crate::types::Donation;

/// Donation records, each stored as JSON under its own id.
pub struct RecordStore<'a, S: ?Sized> {
    state: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> RecordStore<'a, S> {
    pub fn new(state: &'a S) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &'a S {
        self.state
    }

    /// Overwrites whatever is stored under `donation.id`.
    pub fn put(&self, donation: &Donation) -> Result<()> {
        let bytes = serde_json::to_vec(donation)
            .map_err(|e| LedgerError::Store(format!("encoding donation {}: {e}", donation.id)))?;
        self.state.put_state(&donation.id, &bytes)
    }

    pub fn get(&self, id: &str) -> Result<Donation> {
        let bytes = self
            .state
            .get_state(id)?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let donation = serde_json::from_slice(&bytes).map_err(|source| LedgerError::Decode {
            key: id.to_string(),
            source,
        })?;
        debug!(id, "loaded donation");
        Ok(donation)
    }
}
