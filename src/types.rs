use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Create,
}

/// One embedded history entry. Never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "tdate")]
    pub date: String,
    #[serde(default)]
    pub destination: String,
    pub amount: i64,
    #[serde(rename = "projectID")]
    pub project_id: i64,
    #[serde(rename = "ttype")]
    pub kind: TransactionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Donation {
    pub id: String,
    pub owner: String,
    pub amount: i64,
    #[serde(rename = "projectID")]
    pub project_id: i64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Donation {
    pub fn new(id: String, owner: String, project_id: i64, amount: i64) -> Self {
        Donation {
            id,
            owner,
            amount,
            project_id,
            transactions: Vec::new(),
        }
    }

    /// Id for the next history entry: `<donation id>T<sequence>`, starting at 1.
    pub fn next_transaction_id(&self) -> String {
        format!("{}T{}", self.id, self.transactions.len() + 1)
    }

    pub fn record(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}

/// Ordered list of donation ids, the shape of both the stored index and the
/// owner query result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DonationIds {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub donations: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
