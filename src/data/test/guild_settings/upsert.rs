use super::*;

/// Tests creating settings on first update.
///
/// Expected: Ok with only the supplied fields set
#[tokio::test]
async fn creates_settings_row() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let settings = GuildSettingsRepository::new(db)
        .upsert(
            100,
            UpdateGuildSettingsParams {
                draft_channel_id: Some(200),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(
        settings,
        GuildSettings {
            draft_channel_id: Some(200),
            ..GuildSettings::unconfigured(100)
        }
    );

    Ok(())
}

/// Tests that an update keeps fields it does not mention.
///
/// Expected: Ok with new player role and the previous channel retained
#[tokio::test]
async fn merges_with_existing_settings() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = GuildSettingsRepository::new(db);

    repo.upsert(
        100,
        UpdateGuildSettingsParams {
            draft_channel_id: Some(200),
            moderator_role_id: Some(300),
            ..Default::default()
        },
    )
    .await?;
    let settings = repo
        .upsert(
            100,
            UpdateGuildSettingsParams {
                player_role_id: Some(400),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(settings.draft_channel_id, Some(200));
    assert_eq!(settings.moderator_role_id, Some(300));
    assert_eq!(settings.player_role_id, Some(400));
    assert_eq!(repo.get(100).await?, Some(settings));

    Ok(())
}
