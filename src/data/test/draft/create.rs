use super::*;

/// Tests inserting a new draft record.
///
/// Verifies that the repository assigns an ID and that every field, including the JSON
/// columns and message IDs, reads back unchanged.
///
/// Expected: Ok with the stored record equal to the input apart from its ID
#[tokio::test]
async fn creates_draft_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let input = record(100);
    let created = DraftRepository::new(db).create(&input).await?;

    assert!(created.id > 0);
    assert_eq!(
        created,
        DraftRecord {
            id: created.id,
            ..input
        }
    );

    Ok(())
}

/// Tests that the input ID is ignored on insert.
///
/// Expected: Ok with distinct database-assigned IDs
#[tokio::test]
async fn assigns_fresh_ids() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = DraftRepository::new(db);

    let mut input = record(100);
    input.id = 77;
    let first = repo.create(&input).await?;
    let second = repo.create(&input).await?;

    assert_ne!(first.id, second.id);

    Ok(())
}

/// Tests that counts too large for the column are rejected instead of wrapping.
///
/// Expected: Err(ValueOutOfRange) and no row written
#[tokio::test]
async fn rejects_count_past_column_range() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = DraftRepository::new(db);

    let mut input = record(100);
    input.config.required_count = 3_000_000_000;
    let result = repo.create(&input).await;

    assert!(matches!(
        result,
        Err(AppError::InternalErr(InternalError::ValueOutOfRange {
            field: "required_count",
            value: 3_000_000_000,
        }))
    ));
    assert!(repo.find_active_by_guild(100).await?.is_none());

    Ok(())
}
