use storage::repository::KeyValueStore;
use storage::sqlite::SqliteKvStore;

async fn open_memory_store() -> SqliteKvStore {
    let store = SqliteKvStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store
}

#[tokio::test]
async fn missing_key_reads_as_none() {
    let store = open_memory_store().await;
    assert_eq!(store.read_key("lingoleap_user").await.unwrap(), None);
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let store = open_memory_store().await;
    store
        .write_key("lingoleap_completed", r#"["1","2"]"#)
        .await
        .unwrap();

    let value = store.read_key("lingoleap_completed").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"["1","2"]"#));
}

#[tokio::test]
async fn write_upserts_existing_key() {
    let store = open_memory_store().await;
    store.write_key("lingoleap_user", "{}").await.unwrap();
    store
        .write_key("lingoleap_user", r#"{"xp":1260}"#)
        .await
        .unwrap();

    let value = store.read_key("lingoleap_user").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"xp":1260}"#));
}

#[tokio::test]
async fn migration_is_idempotent() {
    let store = SqliteKvStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store.migrate().await.unwrap();

    store.write_key("k", "v").await.unwrap();
    assert_eq!(store.read_key("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn keys_are_independent() {
    let store = open_memory_store().await;
    store.write_key("lingoleap_user", "user-blob").await.unwrap();
    store
        .write_key("lingoleap_completed", "completed-blob")
        .await
        .unwrap();

    assert_eq!(
        store.read_key("lingoleap_user").await.unwrap().as_deref(),
        Some("user-blob")
    );
    assert_eq!(
        store
            .read_key("lingoleap_completed")
            .await
            .unwrap()
            .as_deref(),
        Some("completed-blob")
    );
}
