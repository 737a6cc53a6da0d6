use super::*;

/// Tests recording results for a player without a row.
///
/// Expected: Ok with the row created holding one win
#[tokio::test]
async fn creates_player_on_first_result() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = PlayerRepository::new(db);

    repo.add_win(11).await?;

    let stats = repo.get(11).await?.unwrap();
    assert_eq!((stats.wins, stats.losses), (1, 0));

    Ok(())
}

/// Tests incrementing an existing player's tallies.
///
/// Expected: Ok with each counter increased independently
#[tokio::test]
async fn increments_existing_tallies() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = PlayerRepository::new(db);

    factory::create_player(db, "11", 3, 4).await?;

    repo.add_win(11).await?;
    repo.add_loss(11).await?;
    repo.add_loss(11).await?;

    let stats = repo.get(11).await?.unwrap();
    assert_eq!((stats.wins, stats.losses), (4, 6));

    Ok(())
}
