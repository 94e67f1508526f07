//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.
//! Every operation on user-owned data takes an explicit `RequestContext`.

pub mod account;
pub mod career;
pub mod conversation;
pub mod credential;
pub mod dashboard;
pub mod journal;
pub mod profile;
pub mod story;

use aftergame_types::error::ValidationError;

/// Trim `value` and reject it when nothing is left.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}
