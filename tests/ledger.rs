use std::sync::atomic::{AtomicBool, Ordering};

use donation_ledger::index::INDEX_KEY;
use donation_ledger::types::{Donation, Transaction, TransactionType};
use donation_ledger::{KeyValueStore, Ledger, LedgerError, MemoryState, SqliteState};
use rstest::rstest;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Memory state whose writes to the index key can be made to fail.
#[derive(Default)]
struct FlakyIndexState {
    inner: MemoryState,
    fail_index_writes: AtomicBool,
}

impl KeyValueStore for FlakyIndexState {
    fn get_state(&self, key: &str) -> donation_ledger::Result<Option<Vec<u8>>> {
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> donation_ledger::Result<()> {
        if key == INDEX_KEY && self.fail_index_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Store("index write refused".to_string()));
        }
        self.inner.put_state(key, value)
    }
}

fn end_to_end<S: KeyValueStore>(ledger: Ledger<S>) {
    ledger.initialize().unwrap();
    ledger
        .invoke(
            "createDonation",
            &args(&["100", "7", "alice", "D1", "2016-04-25", "bob"]),
        )
        .unwrap();

    let stored = ledger.records().get("D1").unwrap();
    assert_eq!(
        stored,
        Donation {
            id: "D1".to_string(),
            owner: "alice".to_string(),
            amount: 100,
            project_id: 7,
            transactions: vec![Transaction {
                id: "D1T1".to_string(),
                date: "2016-04-25".to_string(),
                destination: String::new(),
                amount: 100,
                project_id: 7,
                kind: TransactionType::Create,
            }],
        }
    );
    assert_eq!(ledger.donation_ids().unwrap(), vec!["D1"]);
    assert_eq!(ledger.donations_by_owner("alice").unwrap(), vec!["D1"]);
    assert!(ledger.donations_by_owner("carol").unwrap().is_empty());
}

#[test]
fn end_to_end_in_memory() {
    end_to_end(Ledger::new(MemoryState::new()));
}

#[test]
fn end_to_end_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    end_to_end(Ledger::new(
        SqliteState::open(&dir.path().join("ledger.db")).unwrap(),
    ));
}

#[test]
fn index_survives_restart_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let ledger = Ledger::new(SqliteState::open(&path).unwrap());
    ledger.bootstrap().unwrap();
    ledger
        .create_donation(&args(&["3", "1", "alice", "D1", "2016-04-25", "bob"]))
        .unwrap();
    drop(ledger);

    let ledger = Ledger::new(SqliteState::open(&path).unwrap());
    ledger.bootstrap().unwrap();
    assert_eq!(ledger.donations_by_owner("alice").unwrap(), vec!["D1"]);
}

#[test]
fn every_created_donation_is_indexed_and_resolvable() {
    let ledger = Ledger::new(MemoryState::new());
    ledger.initialize().unwrap();
    let owners = ["alice", "bob", "alice", "dave", "bob", "alice"];
    for (n, owner) in owners.into_iter().enumerate() {
        let id = format!("D{n}");
        ledger
            .create_donation(&args(&["10", "1", owner, id.as_str(), "2016-04-25", "x"]))
            .unwrap();
    }

    let ids = ledger.donation_ids().unwrap();
    assert_eq!(ids.len(), owners.len());
    for id in &ids {
        let donation = ledger.records().get(id).unwrap();
        assert_eq!(&donation.id, id);
        assert_eq!(donation.transactions.len(), 1);
        assert_eq!(donation.transactions[0].id, format!("{id}T1"));
    }

    assert_eq!(ledger.donations_by_owner("alice").unwrap(), vec!["D0", "D2", "D5"]);
    assert_eq!(ledger.donations_by_owner("bob").unwrap(), vec!["D1", "D4"]);
    assert_eq!(ledger.donations_by_owner("dave").unwrap(), vec!["D3"]);
}

#[rstest]
#[case::two(&["100", "7"])]
#[case::five(&["100", "7", "alice", "D1", "2016-04-25"])]
#[case::seven(&["100", "7", "alice", "D1", "2016-04-25", "bob", "extra"])]
fn wrong_arity_writes_nothing(#[case] values: &'static [&'static str]) {
    let ledger = Ledger::new(MemoryState::new());
    ledger.initialize().unwrap();

    let err = ledger.invoke("createDonation", &args(values)).unwrap_err();
    assert!(matches!(err, LedgerError::Argument { expected: 6, .. }));
    assert_eq!(ledger.state().get_state("D1").unwrap(), None);
    assert!(ledger.donation_ids().unwrap().is_empty());
}

#[test]
fn malformed_amount_writes_nothing() {
    let ledger = Ledger::new(MemoryState::new());
    ledger.initialize().unwrap();

    let err = ledger
        .create_donation(&args(&["lots", "7", "alice", "D1", "2016-04-25", "bob"]))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Parse { name: "amount", .. }));
    assert_eq!(ledger.state().get_state("D1").unwrap(), None);
}

#[test]
fn failed_index_write_leaves_record_unindexed() {
    let ledger = Ledger::new(FlakyIndexState::default());
    ledger.initialize().unwrap();
    ledger.state().fail_index_writes.store(true, Ordering::SeqCst);

    let err = ledger
        .create_donation(&args(&["100", "7", "alice", "D1", "2016-04-25", "bob"]))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));

    assert_eq!(ledger.records().get("D1").unwrap().owner, "alice");
    assert!(ledger.donation_ids().unwrap().is_empty());
}

#[test]
fn failed_record_write_leaves_index_untouched() {
    struct RefuseRecords(MemoryState);

    impl KeyValueStore for RefuseRecords {
        fn get_state(&self, key: &str) -> donation_ledger::Result<Option<Vec<u8>>> {
            self.0.get_state(key)
        }

        fn put_state(&self, key: &str, value: &[u8]) -> donation_ledger::Result<()> {
            if key == INDEX_KEY {
                return self.0.put_state(key, value);
            }
            Err(LedgerError::Store("record write refused".to_string()))
        }
    }

    let ledger = Ledger::new(RefuseRecords(MemoryState::new()));
    ledger.initialize().unwrap();

    let err = ledger
        .create_donation(&args(&["100", "7", "alice", "D1", "2016-04-25", "bob"]))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));
    assert!(ledger.donation_ids().unwrap().is_empty());
    assert!(matches!(ledger.records().get("D1"), Err(LedgerError::NotFound(_))));
}

#[test]
fn reinitialize_drops_index_but_keeps_records() {
    let ledger = Ledger::new(MemoryState::new());
    ledger.initialize().unwrap();
    ledger
        .create_donation(&args(&["1", "1", "alice", "D1", "2016-04-25", "bob"]))
        .unwrap();

    ledger.invoke("init", &[]).unwrap();
    assert!(ledger.donations_by_owner("alice").unwrap().is_empty());
    assert!(ledger.records().get("D1").is_ok());
}
