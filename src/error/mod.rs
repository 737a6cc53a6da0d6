//! Error types and interaction reply mapping.
//!
//! This module provides the application's error hierarchy. `AppError` is the top-level
//! type that wraps domain-specific errors. Command and button handlers turn it into a
//! reply with `AppError::user_message`: draft rule violations are shown to the user as
//! written, everything else is logged and replaced with a generic message.

pub mod config;
pub mod draft;
pub mod internal;

use thiserror::Error;

use crate::error::{config::ConfigError, draft::DraftError, internal::InternalError};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// A draft operation was rejected by the draft rules.
    ///
    /// The message is safe to show to the user who triggered the operation.
    #[error(transparent)]
    DraftErr(#[from] DraftError),

    /// Unexpected internal state such as an unparseable stored ID.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Stored JSON column could not be decoded.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Malformed interaction input such as a missing command option.
    ///
    /// # Fields
    /// - Message describing what was wrong with the input
    #[error("{0}")]
    BadRequest(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Converts the error into the text sent back to the interacting user.
    ///
    /// Draft rule violations and not-found or bad-request errors are returned verbatim.
    /// Every other variant is logged with full details and replaced with a generic
    /// message to avoid leaking implementation details into the channel.
    ///
    /// # Returns
    /// - Reply text for the interaction
    pub fn user_message(&self) -> String {
        match self {
            Self::DraftErr(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            err => {
                tracing::error!("{}", err);
                "Something went wrong, please try again".to_string()
            }
        }
    }
}
