#![cfg(feature = "native")]

use sqlite_vec_unified::prelude::*;

fn memory_db() -> UnifiedDatabase {
    UnifiedDatabase::native_builder(":memory:")
        .extension(ExtensionPolicy::Disabled)
        .build()
}

#[tokio::test]
async fn native_insert_and_select_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a, b)").await?;

    let insert = db
        .prepare("INSERT INTO t VALUES (?1, ?2)", Some("ins"))
        .await?;
    assert_eq!(insert.meta().style, PlaceholderStyle::Numeric);
    assert_eq!(insert.meta().param_count, 2);
    insert
        .run(Some(vec![SqlValue::Int(1), SqlValue::Int(2)].into()))
        .await?;

    let select = db.prepare("SELECT a, b FROM t", Some("sel")).await?;
    let rows = select.all(None).await?;
    assert_eq!(rows.rows.len(), 1);
    assert_eq!(rows.rows[0].get("a").unwrap().as_int(), Some(&1));
    assert_eq!(rows.rows[0].get("b").unwrap().as_int(), Some(&2));

    // The call-based engine has no cursor; step is a documented no-op.
    assert!(!select.step().await?);
    Ok(())
}

#[tokio::test]
async fn native_named_parameters_bind_by_name() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE people (id INTEGER, name TEXT)").await?;

    let insert = db
        .prepare("INSERT INTO people (id, name) VALUES (:id, :name)", None)
        .await?;
    assert_eq!(insert.meta().style, PlaceholderStyle::Named);
    // Keys may come with or without their sigil.
    insert
        .run(Some(ParamSet::named(vec![
            ("id", SqlValue::Int(7)),
            (":name", SqlValue::Text("alice".into())),
        ])))
        .await?;

    let select = db
        .prepare("SELECT name FROM people WHERE id = :id", None)
        .await?;
    let row = select
        .get(Some(ParamSet::named(vec![("id", SqlValue::Int(7))])))
        .await?
        .expect("row");
    assert_eq!(row.get("name").unwrap().as_text(), Some("alice"));
    Ok(())
}

#[tokio::test]
async fn native_blob_roundtrip_preserves_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE blobs (data BLOB)").await?;

    let payload: Vec<u8> = (0u8..12).collect();
    db.prepare("INSERT INTO blobs VALUES (?1)", None)
        .await?
        .run(Some(vec![SqlValue::blob_from(&payload)].into()))
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
async fn native_oversupplied_positional_values_are_clamped()
-> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a, b)").await?;

    // Three values against two slots: the extra trailing value is dropped
    // rather than surfacing an engine bind error.
    db.prepare("INSERT INTO t VALUES (?1, ?2)", None)
        .await?
        .run(Some(
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)].into(),
        ))
        .await?;

    let row = db
        .prepare("SELECT a, b FROM t", None)
        .await?
        .get(None)
        .await?
        .expect("row");
    assert_eq!(row.get("a").unwrap().as_int(), Some(&1));
    assert_eq!(row.get("b").unwrap().as_int(), Some(&2));
    Ok(())
}

#[tokio::test]
async fn native_get_on_empty_result_is_none() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a)").await?;
    let select = db.prepare("SELECT a FROM t WHERE a = ?1", None).await?;
    let row = select.get(Some(vec![SqlValue::Int(999)].into())).await?;
    assert!(row.is_none());
    Ok(())
}

#[tokio::test]
async fn native_bound_values_are_single_shot_per_run() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a)").await?;

    let insert = db.prepare("INSERT INTO t VALUES (?1)", None).await?;
    insert.bind(vec![SqlValue::Int(5)]).await;
    insert.run(None).await?;
    // The first run consumed the binding; with nothing left to bind the
    // engine rejects the second execution.
    assert!(insert.run(None).await.is_err());

    let rows = db
        .prepare("SELECT a FROM t", None)
        .await?
        .all(None)
        .await?;
    assert_eq!(rows.rows.len(), 1);
    assert_eq!(rows.rows[0].get("a").unwrap().as_int(), Some(&5));
    Ok(())
}

#[tokio::test]
async fn native_timestamps_survive_text_storage() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE events (at TEXT)").await?;

    let ts = chrono::NaiveDate::from_ymd_opt(2024, 5, 17)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    db.prepare("INSERT INTO events VALUES (?1)", None)
        .await?
        .run(Some(vec![SqlValue::Timestamp(ts)].into()))
        .await?;

    let row = db
        .prepare("SELECT at FROM events", None)
        .await?
        .get(None)
        .await?
        .expect("row");
    assert_eq!(row.get("at").unwrap().as_timestamp(), Some(ts));
    Ok(())
}

#[tokio::test]
async fn native_status_tracks_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    assert_eq!(db.status(), Status::Closed);
    db.open().await?;
    assert_eq!(db.status(), Status::Open);
    db.open().await?; // idempotent
    assert_eq!(db.status(), Status::Open);
    db.close().await;
    assert_eq!(db.status(), Status::Closed);
    db.close().await; // no-op when already closed
    assert_eq!(db.status(), Status::Closed);
    Ok(())
}

#[tokio::test]
async fn native_destroy_removes_backing_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("unit.db");
    let mut db = UnifiedDatabase::native_builder(path.to_string_lossy().into_owned())
        .extension(ExtensionPolicy::Disabled)
        .build();
    db.exec("CREATE TABLE t (a)").await?;
    assert!(path.exists());

    db.destroy().await;
    assert_eq!(db.status(), Status::Closed);
    assert!(!path.exists());
    Ok(())
}

#[tokio::test]
async fn native_one_shot_executor_bypasses_the_cache() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    db.exec("CREATE TABLE t (a)").await?;

    let affected = db
        .execute_dml(
            "INSERT INTO t VALUES (?1)",
            &ParamSet::positional(vec![SqlValue::Int(3)]),
        )
        .await?;
    assert_eq!(affected, 1);
    assert_eq!(db.cached_statement_count(), 0);

    let rows = db.execute_select("SELECT a FROM t", &ParamSet::Empty).await?;
    assert_eq!(rows.rows[0].get("a").unwrap().as_int(), Some(&3));
    Ok(())
}

#[tokio::test]
async fn native_version_reports_the_engine() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db();
    let version = db.version().await?;
    assert!(!version.lib_version.is_empty());
    // No extension is resident in this test, so vec_version stays absent.
    assert!(version.vec_version.is_none());
    Ok(())
}
