use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use shared_store::{JsonStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Ledger {
    entries: Vec<String>,
}

fn push_entry(ledger: &mut Ledger, entry: &str) -> Result<(), StoreError> {
    ledger.entries.push(entry.to_string());
    Ok(())
}

#[tokio::test]
async fn missing_file_starts_from_the_default_document() {
    let dir = TempDir::new().unwrap();
    let store: JsonStore<Ledger> =
        JsonStore::load(dir.path().join("ledger.json"), Ledger::default()).unwrap();

    assert_eq!(store.snapshot().await, Ledger::default());
}

#[tokio::test]
async fn mutate_persists_and_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");

    let store: JsonStore<Ledger> = JsonStore::load(&path, Ledger::default()).unwrap();
    store.mutate(|l| push_entry(l, "first")).await.unwrap();
    store.mutate(|l| push_entry(l, "second")).await.unwrap();

    let reloaded: JsonStore<Ledger> = JsonStore::load(&path, Ledger::default()).unwrap();
    assert_eq!(
        reloaded.snapshot().await.entries,
        vec!["first".to_string(), "second".to_string()]
    );
    // The sibling temp file is gone once the rename lands.
    assert!(!dir.path().join("ledger.json.tmp").exists());
}

#[tokio::test]
async fn failed_closure_leaves_memory_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");

    let store: JsonStore<Ledger> = JsonStore::load(&path, Ledger::default()).unwrap();
    store.mutate(|l| push_entry(l, "kept")).await.unwrap();

    let result: Result<(), StoreError> = store
        .mutate(|l| {
            push_entry(l, "rejected")?;
            Err(StoreError::Io(std::io::Error::other("validation failed")))
        })
        .await;
    assert!(result.is_err());

    assert_eq!(store.snapshot().await.entries, vec!["kept".to_string()]);
    let on_disk: Ledger = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.entries, vec!["kept".to_string()]);
}

#[tokio::test]
async fn persist_failure_keeps_the_prior_document_in_memory() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("work");
    std::fs::create_dir(&work).unwrap();
    let path = work.join("ledger.json");

    let store: JsonStore<Ledger> = JsonStore::load(&path, Ledger::default()).unwrap();
    store.mutate(|l| push_entry(l, "committed")).await.unwrap();

    // The document's directory disappears, so the next persist cannot land.
    std::fs::remove_dir_all(&work).unwrap();

    let result: Result<(), StoreError> = store.mutate(|l| push_entry(l, "lost")).await;
    assert!(result.is_err());

    // The failed write never reached the in-memory document.
    assert_eq!(store.snapshot().await.entries, vec!["committed".to_string()]);
}
