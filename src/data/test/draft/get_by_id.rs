use super::*;

/// Tests getting a draft that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_draft() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = DraftRepository::new(db).get_by_id(999).await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests reading a row with an unknown phase name.
///
/// Verifies that corrupt rows surface as an internal error instead of a default phase.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn rejects_unknown_phase() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::draft::DraftFactory::new(db, "100")
        .phase("Paused")
        .build()
        .await?;

    let result = DraftRepository::new(db).get_by_id(row.id).await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}
