use super::*;

/// Tests finding the active draft of a guild.
///
/// Verifies that canceled drafts and other guilds' drafts are ignored and that the
/// newest active draft wins.
///
/// Expected: Ok(Some) with the newest non-canceled draft of the guild
#[tokio::test]
async fn finds_newest_active_draft() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::draft::DraftFactory::new(db, "100")
        .created_at(now() - Duration::days(2))
        .build()
        .await?;
    let newest = factory::draft::DraftFactory::new(db, "100")
        .created_at(now() - Duration::days(1))
        .embed_message_id(Some("5000".to_string()))
        .build()
        .await?;
    factory::draft::DraftFactory::new(db, "100")
        .created_at(now())
        .canceled_at(Some(now()))
        .build()
        .await?;
    factory::create_draft(db, "101").await?;

    let found = DraftRepository::new(db)
        .find_active_by_guild(100)
        .await?
        .unwrap();

    assert_eq!(found.id, newest.id);
    assert_eq!(found.messages.embed, Some(5000));

    Ok(())
}

/// Tests a guild whose only draft was canceled.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_canceled_drafts() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::draft::DraftFactory::new(db, "100")
        .canceled_at(Some(now()))
        .build()
        .await?;

    let found = DraftRepository::new(db).find_active_by_guild(100).await?;

    assert!(found.is_none());

    Ok(())
}
