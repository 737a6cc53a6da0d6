use sea_orm::EntityTrait;

use super::*;

/// Tests overwriting an existing record.
///
/// Verifies that a later snapshot replaces roster, phase, and cancellation fields.
///
/// Expected: Ok with the stored record matching the latest snapshot
#[tokio::test]
async fn overwrites_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = DraftRepository::new(db);

    let mut snapshot = repo.create(&record(100)).await?;
    snapshot.roster.truncate(1);
    snapshot.phase = Phase::Canceled;
    snapshot.canceled_at = Some(now() + Duration::hours(1));
    snapshot.canceled_by = Some(300);
    snapshot.messages = MessageRefs {
        canceled: Some(6000),
        ..Default::default()
    };

    repo.upsert(&snapshot).await?;

    let stored = repo.get_by_id(snapshot.id).await?.unwrap();
    assert_eq!(stored, snapshot);

    Ok(())
}

/// Tests that repeating the same write is harmless.
///
/// Expected: Ok with a single row holding the record
#[tokio::test]
async fn repeated_upsert_is_idempotent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = DraftRepository::new(db);

    let snapshot = repo.create(&record(100)).await?;
    repo.upsert(&snapshot).await?;
    repo.upsert(&snapshot).await?;

    let rows = entity::prelude::Draft::find().all(db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(repo.get_by_id(snapshot.id).await?, Some(snapshot));

    Ok(())
}

/// Tests that upsert inserts a record whose row is missing.
///
/// Expected: Ok with the row created under the record's ID
#[tokio::test]
async fn inserts_missing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = DraftRepository::new(db);

    let mut snapshot = record(100);
    snapshot.id = 42;
    repo.upsert(&snapshot).await?;

    assert_eq!(repo.get_by_id(42).await?, Some(snapshot));

    Ok(())
}
