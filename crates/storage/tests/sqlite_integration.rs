use storage::repository::{KeyValueRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_overwrites_slot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get("animal_game_levels").await.unwrap().is_none());

    repo.set("animal_game_levels", r#"[{"id":1,"stars":0,"isLocked":false}]"#)
        .await
        .unwrap();
    repo.set("animal_game_levels", r#"[{"id":1,"stars":3,"isLocked":false}]"#)
        .await
        .unwrap();

    let stored = repo.get("animal_game_levels").await.expect("get");
    assert_eq!(
        stored.as_deref(),
        Some(r#"[{"id":1,"stars":3,"isLocked":false}]"#)
    );
}

#[tokio::test]
async fn sqlite_remove_clears_only_that_key() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_remove?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set("a", "1").await.unwrap();
    repo.set("b", "2").await.unwrap();
    repo.remove("a").await.unwrap();
    repo.remove("a").await.unwrap();

    assert!(repo.get("a").await.unwrap().is_none());
    assert_eq!(repo.get("b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(row.0, 1);
}

#[tokio::test]
async fn storage_sqlite_exposes_kv_slot() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.set("slot", "value").await.unwrap();
    assert_eq!(storage.kv.get("slot").await.unwrap().as_deref(), Some("value"));
}
