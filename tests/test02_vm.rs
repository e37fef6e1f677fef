#![cfg(feature = "vm")]

use sqlite_vec_unified::prelude::*;

fn memory_db() -> UnifiedDatabase {
    UnifiedDatabase::vm_builder(":memory:").build()
}

#[tokio::test]
async fn vm_insert_and_select_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a INTEGER, b INTEGER)").await?;

    let insert = db
        .prepare("INSERT INTO t VALUES (?1, ?2)", Some("ins"))
        .await?;
    insert
        .run(Some(vec![SqlValue::Int(1), SqlValue::Int(2)].into()))
        .await?;

    let rows = db
        .prepare("SELECT a, b FROM t", Some("sel"))
        .await?
        .all(None)
        .await?;
    assert_eq!(rows.rows.len(), 1);
    assert_eq!(rows.rows[0].get("a").unwrap().as_int(), Some(&1));
    assert_eq!(rows.rows[0].get("b").unwrap().as_int(), Some(&2));
    Ok(())
}

#[tokio::test]
async fn vm_blob_roundtrip_preserves_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE blobs (data BLOB)").await?;

    let payload: Vec<u8> = (0u8..12).collect();
    db.prepare("INSERT INTO blobs VALUES (?1)", None)
        .await?
        .run(Some(vec![SqlValue::Blob(payload.clone())].into()))
        .await?;

    let row = db
        .prepare("SELECT data FROM blobs", None)
        .await?
        .get(None)
        .await?
        .expect("row");
    let read_back = row.get("data").unwrap().as_blob().expect("blob");
    assert_eq!(read_back.len(), 12);
    assert_eq!(read_back, payload.as_slice());
    Ok(())
}

#[tokio::test]
async fn vm_float_vectors_bind_as_little_endian_blobs()
-> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE embeddings (v BLOB)").await?;

    let lanes = vec![0.25f32, -1.5, 3.0];
    db.prepare("INSERT INTO embeddings VALUES (?1)", None)
        .await?
        .run(Some(vec![SqlValue::FloatVec(lanes.clone())].into()))
        .await?;

    let row = db
        .prepare("SELECT v FROM embeddings", None)
        .await?
        .get(None)
        .await?
        .expect("row");
    let blob = row.get("v").unwrap().as_blob().expect("blob");
    assert_eq!(blob.len(), lanes.len() * 4);
    let expected: Vec<u8> = lanes.iter().flat_map(|lane| lane.to_le_bytes()).collect();
    assert_eq!(blob, expected.as_slice());
    Ok(())
}

#[tokio::test]
async fn vm_step_walks_the_cursor_to_exhaustion() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec(
        "CREATE TABLE t (a INTEGER);
         INSERT INTO t VALUES (1);
         INSERT INTO t VALUES (2);
         INSERT INTO t VALUES (3);",
    )
    .await?;

    let select = db.prepare("SELECT a FROM t", None).await?;
    let mut advances = 0;
    while select.step().await? {
        advances += 1;
        assert!(advances <= 3, "cursor failed to signal exhaustion");
    }
    assert_eq!(advances, 3);
    Ok(())
}

#[tokio::test]
async fn vm_get_does_not_leak_cursor_state() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec(
        "CREATE TABLE t (a INTEGER);
         INSERT INTO t VALUES (10);
         INSERT INTO t VALUES (20);",
    )
    .await?;

    let select = db.prepare("SELECT a FROM t ORDER BY a", Some("q"))
        .await?;
    // Two gets in a row both see the first row; the mandatory reset after
    // each keeps the cursor from drifting.
    let first = select.get(None).await?.expect("row");
    let second = select.get(None).await?.expect("row");
    assert_eq!(first.get("a").unwrap().as_int(), Some(&10));
    assert_eq!(second.get("a").unwrap().as_int(), Some(&10));
    Ok(())
}

#[tokio::test]
async fn vm_bind_then_step_uses_staged_values() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec(
        "CREATE TABLE t (a INTEGER);
         INSERT INTO t VALUES (1);
         INSERT INTO t VALUES (2);",
    )
    .await?;

    let select = db.prepare("SELECT a FROM t WHERE a >= ?1", None).await?;
    select.bind(vec![SqlValue::Int(2)]).await;
    assert!(select.step().await?);
    assert!(!select.step().await?);
    Ok(())
}

#[tokio::test]
async fn vm_storage_dir_persists_across_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let mut db = UnifiedDatabase::vm_builder(":memory:")
        .storage_dir(dir.path())
        .build();
    db.exec("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (42);")
        .await?;
    db.close().await;
    assert!(dir.path().join("db.sqlite").exists());

    // A fresh façade over the same directory sees the durable rows.
    let mut reopened = UnifiedDatabase::vm_builder(":memory:")
        .storage_dir(dir.path())
        .build();
    let row = reopened
        .prepare("SELECT a FROM t", None)
        .await?
        .get(None)
        .await?
        .expect("row");
    assert_eq!(row.get("a").unwrap().as_int(), Some(&42));

    reopened.destroy().await;
    assert!(!dir.path().join("db.sqlite").exists());
    Ok(())
}

#[tokio::test]
async fn vm_finalize_releases_a_caller_owned_statement()
-> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a INTEGER)").await?;

    let stmt = db.prepare("SELECT a FROM t", None).await?;
    stmt.finalize().await?;
    // A second finalize is a no-op.
    stmt.finalize().await?;
    // Execution after finalize is rejected rather than undefined.
    assert!(stmt.all(None).await.is_err());
    Ok(())
}
