//! Error types raised by the core crate.

/// Failure of a [`suggest`](crate::suggest::suggest) call.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// The requested user does not exist. No partial report is produced.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// Identifier that failed to resolve
        user_id: i64,
    },

    /// The backing store failed to read pantry or recipe data.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// A domain rule rejected an incoming value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("quantity must be a positive integer, got {0}")]
    NonPositiveQuantity(i64),

    #[error("default_shelf_life_days must be >= 0, got {0}")]
    NegativeShelfLife(i64),

    #[error("expiry date out of range: {start} + {days} days")]
    ExpiryOutOfRange { start: chrono::NaiveDate, days: i64 },

    #[error("internal recipes require instructions")]
    MissingInstructions,

    #[error("internal recipes must not have a link")]
    UnexpectedLink,

    #[error("external recipes require a link")]
    MissingLink,

    #[error("external recipes must not have instructions")]
    UnexpectedInstructions,

    #[error("unknown recipe kind '{0}', expected internal or external")]
    UnknownRecipeKind(String),
}
