use tracing::{error, info};

use crate::error::{LedgerError, Result};
use crate::index::{Index, INDEX_KEY};
use crate::records::RecordStore;
use crate::state::KeyValueStore;
use crate::types::{Donation, Transaction, TransactionType};

pub const CREATE_ARGS: usize = 6;

/// Validated arguments of `createDonation`, in invocation order:
/// amount, projectID, owner, id, date, destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDonation {
    pub amount: i64,
    pub project_id: i64,
    pub owner: String,
    pub id: String,
    pub date: String,
    pub destination: String,
}

impl CreateDonation {
    pub fn parse(args: &[String]) -> Result<Self> {
        let [amount, project_id, owner, id, date, destination] = args else {
            return Err(LedgerError::Argument {
                expected: CREATE_ARGS,
                got: args.len(),
            });
        };
        if id == INDEX_KEY {
            return Err(LedgerError::InvalidArgument(format!(
                "donation id {id:?} is reserved"
            )));
        }
        Ok(Self {
            amount: parse_int("amount", amount)?,
            project_id: parse_int("projectID", project_id)?,
            owner: owner.clone(),
            id: id.clone(),
            date: date.clone(),
            destination: destination.clone(),
        })
    }

    /// The donation with its CREATE entry, not yet persisted.
    ///
    /// `destination` is accepted but not recorded on the CREATE entry.
    pub fn into_donation(self) -> Donation {
        let mut donation = Donation::new(self.id, self.owner, self.project_id, self.amount);
        let tx = Transaction {
            id: donation.next_transaction_id(),
            date: self.date,
            destination: String::new(),
            amount: self.amount,
            project_id: self.project_id,
            kind: TransactionType::Create,
        };
        donation.record(tx);
        donation
    }
}

fn parse_int(name: &'static str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| LedgerError::Parse {
        name,
        value: value.to_string(),
    })
}

/// Stores the record, then indexes it.
///
/// The two writes are not atomic. If the index append fails the record stays
/// stored but unindexed; the error is returned and nothing is rolled back.
pub fn create_donation<S: KeyValueStore + ?Sized>(
    state: &S,
    index: &Index,
    args: &[String],
) -> Result<Donation> {
    let donation = CreateDonation::parse(args)?.into_donation();

    RecordStore::new(state).put(&donation)?;
    if let Err(e) = index.append(state, &donation.id) {
        error!(id = %donation.id, error = %e, "donation stored but not indexed");
        return Err(e);
    }

    info!(
        id = %donation.id,
        owner = %donation.owner,
        project_id = donation.project_id,
        amount = donation.amount,
        "donation committed"
    );
    Ok(donation)
}
