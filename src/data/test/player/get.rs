use super::*;

/// Tests reading a player that never played.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_player() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_player(db, "12", 1, 1).await?;

    let stats = PlayerRepository::new(db).get(11).await?;

    assert!(stats.is_none());

    Ok(())
}
