use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::records::RecordStore;
use crate::state::KeyValueStore;
use crate::types::DonationIds;

/// Well-known key holding every donation id in creation order.
pub const INDEX_KEY: &str = "allDonations";

/// Handle to the `allDonations` entity.
///
/// All writes to the index key go through this handle and hold `writer` for
/// the whole read-modify-write, so appends from concurrent creates cannot
/// overwrite each other. The lock only covers writers sharing one handle;
/// other processes writing the same store are not serialized.
#[derive(Default)]
pub struct Index {
    writer: Mutex<()>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the index to an empty sequence. Destructive when ids already exist.
    pub fn initialize<S: KeyValueStore + ?Sized>(&self, state: &S) -> Result<()> {
        let _guard = self.lock()?;
        write(state, &DonationIds::default())?;
        info!("donation index reset");
        Ok(())
    }

    /// Appends `id` to the end of the index. No uniqueness check is made.
    pub fn append<S: KeyValueStore + ?Sized>(&self, state: &S, id: &str) -> Result<()> {
        let _guard = self.lock()?;
        let mut ids = read(state)?;
        ids.donations.push(id.to_string());
        write(state, &ids)?;
        debug!(id, len = ids.donations.len(), "appended to donation index");
        Ok(())
    }

    pub fn ids<S: KeyValueStore + ?Sized>(&self, state: &S) -> Result<Vec<String>> {
        Ok(read(state)?.donations)
    }

    pub fn exists<S: KeyValueStore + ?Sized>(&self, state: &S) -> Result<bool> {
        Ok(state.get_state(INDEX_KEY)?.is_some())
    }

    /// Ids of every donation whose owner is `owner`, in index order.
    ///
    /// A missing or undecodable record aborts the scan with an error rather
    /// than being skipped.
    pub fn list_by_owner<S: KeyValueStore + ?Sized>(
        &self,
        records: &RecordStore<'_, S>,
        owner: &str,
    ) -> Result<Vec<String>> {
        let ids = read(records.state())?;
        let mut owned = Vec::new();
        for id in ids.donations {
            let donation = records.get(&id)?;
            if donation.owner == owner {
                owned.push(donation.id);
            }
        }
        debug!(owner, matched = owned.len(), "listed donations by owner");
        Ok(owned)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| LedgerError::Store("index writer lock poisoned".to_string()))
    }
}

fn read<S: KeyValueStore + ?Sized>(state: &S) -> Result<DonationIds> {
    let bytes = state
        .get_state(INDEX_KEY)?
        .ok_or_else(|| LedgerError::NotFound(INDEX_KEY.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|source| LedgerError::Decode {
        key: INDEX_KEY.to_string(),
        source,
    })
}

fn write<S: KeyValueStore + ?Sized>(state: &S, ids: &DonationIds) -> Result<()> {
    let bytes = serde_json::to_vec(ids)
        .map_err(|e| LedgerError::Store(format!("encoding donation index: {e}")))?;
    state.put_state(INDEX_KEY, &bytes)
}
