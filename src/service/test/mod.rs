use sea_orm::DatabaseConnection;

use crate::{
    engine::{
        registry::DraftRegistry,
        test::{context, Fakes, CHANNEL, GUILD, HOST},
    },
    error::{draft::DraftError, AppError},
    model::draft::{CreateDraftParams, DraftDefaults},
    service::draft::DraftService,
};
use test_utils::{builder::TestBuilder, factory};

mod player;

fn defaults() -> DraftDefaults {
    DraftDefaults {
        location: "Great Temple of Balthazar - AE1".to_string(),
        required_count: 16,
        ready_wait_minutes: 5,
        time_offset_minutes: 120,
    }
}

fn params() -> CreateDraftParams {
    CreateDraftParams {
        guild_id: GUILD,
        channel_id: CHANNEL,
        host_id: HOST,
        ..Default::default()
    }
}

fn registry() -> (DraftRegistry, Fakes) {
    let (ctx, fakes) = context();
    (DraftRegistry::new(ctx), fakes)
}

fn draft_service<'a>(
    db: &'a DatabaseConnection,
    registry: &'a DraftRegistry,
    defaults: &'a DraftDefaults,
) -> DraftService<'a> {
    DraftService::new(db, registry, defaults)
}
