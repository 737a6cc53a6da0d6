use thiserror::Error;

/// Rejections produced by draft operations.
///
/// Every message is worded for the Discord user who triggered the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Active draft already exists. You need to cancel it first.")]
    AlreadyActive,

    #[error("There is no active draft")]
    NoActiveDraft,

    #[error("The draft has been canceled")]
    Canceled,

    #[error("The draft has already started")]
    AlreadyStarted,

    #[error("Sign-ups are not open yet")]
    SignupsNotOpen,

    #[error("You have already joined the draft")]
    AlreadyJoined,

    #[error("This player is not in the draft")]
    NotInDraft,

    #[error("This player is not in the count")]
    NotInCount,

    /// Ready toggles are only accepted once the start time passed with a full count.
    #[error("You cannot ready up until the draft has started and the count is full")]
    CannotReadyYet,

    #[error("The draft does not have enough players to start")]
    NotFilled,

    /// Holds the number of players in the count who have not readied.
    #[error("{0} player(s) in the count are not ready")]
    NotAllReady(usize),

    #[error("Team {0} does not exist")]
    UnknownTeam(u8),

    #[error("This player is already a captain")]
    AlreadyCaptain,

    #[error("This player is already on a team")]
    AlreadyOnTeam,

    #[error("This player is on another team")]
    OnAnotherTeam,

    #[error("This player is not on that team")]
    NotOnTeam,

    #[error("You are not a captain, cannot pick players")]
    NotACaptain,

    #[error("A winner has been declared recently, please wait")]
    WinnerRecentlyDeclared,

    #[error("Invalid channel, please use <#{0}>")]
    WrongChannel(u64),

    #[error("You must have the <@&{0}> role to use this command")]
    MissingRole(u64),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Configuration values rejected when creating or restoring a draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Player count must be at least 1")]
    RequiredCountTooSmall,

    #[error("Player count cannot be more than {0}")]
    RequiredCountTooLarge(u32),

    #[error("Ready wait time must be at least 1 minute")]
    ReadyWaitTooShort,

    #[error("Ready wait time cannot be more than {0} minutes")]
    ReadyWaitTooLong(u32),

    #[error("Meeting location cannot be empty")]
    EmptyLocation,

    #[error("Invalid start time '{0}', expected HH:mm")]
    InvalidStartTime(String),
}
