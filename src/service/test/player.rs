use super::*;
use crate::service::player::PlayerService;

/// Tests reading the stats of a player with recorded results.
///
/// Expected: Ok with the stored wins and losses
#[tokio::test]
async fn stats_reads_recorded_results() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_player(db, "11", 4, 2).await?;

    let stats = PlayerService::new(db).stats(11).await?;

    assert_eq!(stats.wins, 4);
    assert_eq!(stats.losses, 2);

    Ok(())
}

/// Tests reading the stats of a player who never finished a draft.
///
/// Expected: Ok with zero wins and losses
#[tokio::test]
async fn stats_default_to_zero() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_draft_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stats = PlayerService::new(db).stats(11).await?;

    assert_eq!(stats, crate::model::player::PlayerStats::unplayed(11));

    Ok(())
}
