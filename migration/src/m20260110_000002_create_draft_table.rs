use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Draft::Table)
                    .if_not_exists()
                    .col(pk_auto(Draft::Id))
                    .col(string(Draft::GuildId))
                    .col(string(Draft::ChannelId))
                    .col(string(Draft::HostId))
                    .col(timestamp(Draft::ScheduledAt))
                    .col(string(Draft::Location))
                    .col(text(Draft::Description))
                    .col(integer(Draft::RequiredCount))
                    .col(boolean(Draft::OpenPool).default(false))
                    .col(boolean(Draft::SkipOpenPing).default(false))
                    .col(integer(Draft::ReadyWaitMinutes))
                    .col(string(Draft::Phase))
                    .col(timestamp_null(Draft::CanceledAt))
                    .col(string_null(Draft::CanceledBy))
                    .col(json(Draft::Roster))
                    .col(json(Draft::Teams))
                    .col(json(Draft::UsageLog))
                    .col(json(Draft::Ready))
                    .col(timestamp_null(Draft::ReadyDeadline))
                    .col(string_null(Draft::EmbedMessageId))
                    .col(string_null(Draft::OpenedMessageId))
                    .col(string_null(Draft::FullMessageId))
                    .col(string_null(Draft::CanceledMessageId))
                    .col(
                        timestamp(Draft::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_draft_guild_canceled")
                    .table(Draft::Table)
                    .col(Draft::GuildId)
                    .col(Draft::CanceledAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Draft::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Draft {
    Table,
    Id,
    GuildId,
    ChannelId,
    HostId,
    ScheduledAt,
    Location,
    Description,
    RequiredCount,
    OpenPool,
    SkipOpenPing,
    ReadyWaitMinutes,
    Phase,
    CanceledAt,
    CanceledBy,
    Roster,
    Teams,
    UsageLog,
    Ready,
    ReadyDeadline,
    EmbedMessageId,
    OpenedMessageId,
    FullMessageId,
    CanceledMessageId,
    CreatedAt,
}
