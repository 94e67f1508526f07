use thiserror::Error;

/// Failure taxonomy of a chat turn, shared by the relay and the client.
///
/// `Display` is for logs. What an end user sees comes from
/// [`ChatError::user_message`], which never includes upstream bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("rate limited by upstream gateway")]
    RateLimited,

    #[error("upstream quota exhausted")]
    QuotaExhausted,

    #[error("upstream error: HTTP {status}")]
    Upstream { status: u16, body: String },

    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    /// The single human-readable notification shown for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::InvalidInput(msg) => msg.clone(),
            ChatError::Unauthorized => "Unauthorized".to_string(),
            ChatError::RateLimited => "Rate limit exceeded. Please try again later.".to_string(),
            ChatError::QuotaExhausted => {
                "AI credits exhausted. Please add credits to continue.".to_string()
            }
            ChatError::Upstream { .. } => "AI service error".to_string(),
            ChatError::StreamInterrupted(_) => {
                "The response was interrupted. Please try again.".to_string()
            }
            ChatError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Whether the caller may reasonably try the same turn again later.
    ///
    /// Nothing retries automatically; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::RateLimited | ChatError::StreamInterrupted(_))
    }
}

/// Errors from repository operations (used by trait definitions in aftergame-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to account sign-up, login and token handling.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the profile, journal and career services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Repository(other),
        }
    }
}
