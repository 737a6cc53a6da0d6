use crate::{
    data::guild_settings::GuildSettingsRepository,
    error::AppError,
    model::settings::{GuildSettings, UpdateGuildSettingsParams},
};
use test_utils::{builder::TestBuilder, factory};

mod get;
mod upsert;
