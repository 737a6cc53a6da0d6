use super::*;

/// Tests reading stored settings.
///
/// Expected: Ok(Some) with string IDs parsed
#[tokio::test]
async fn gets_stored_settings() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_settings::GuildSettingsFactory::new(db, "100")
        .draft_channel_id(Some("200".to_string()))
        .player_role_id(None)
        .build()
        .await?;

    let settings = GuildSettingsRepository::new(db).get(100).await?.unwrap();

    assert_eq!(settings.guild_id, 100);
    assert_eq!(settings.draft_channel_id, Some(200));
    assert_eq!(settings.player_role_id, None);
    assert!(settings.moderator_role_id.is_some());

    Ok(())
}

/// Tests reading settings for a guild that never configured the bot.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unconfigured_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let settings = GuildSettingsRepository::new(db).get(100).await?;

    assert!(settings.is_none());

    Ok(())
}
