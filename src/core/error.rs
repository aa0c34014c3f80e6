use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// The bank-related variants (`NoBanks`, `BankNotFound`, `DuplicateBankName`) are
/// user-recoverable: flows handle them by re-prompting the same step instead of
/// aborting the conversation. Everything else is infrastructure.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Conversation-state (de)serialization errors
    #[error("Process state error: {0}")]
    ProcessState(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The account has no piggy banks yet
    #[error("no piggy banks on this account")]
    NoBanks,

    /// No piggy bank with the given name on this account
    #[error("piggy bank not found")]
    BankNotFound,

    /// A piggy bank with the given name already exists on this account
    #[error("piggy bank name already taken")]
    DuplicateBankName,

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error is recoverable by re-prompting the user.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::NoBanks | AppError::BankNotFound | AppError::DuplicateBankName
        )
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_recoverable() {
        assert!(AppError::BankNotFound.is_user_error());
        assert!(AppError::DuplicateBankName.is_user_error());
        assert!(AppError::NoBanks.is_user_error());
    }

    #[test]
    fn test_infrastructure_errors_are_not_recoverable() {
        let err = AppError::Io(std::io::Error::other("disk gone"));
        assert!(!err.is_user_error());
    }
}
