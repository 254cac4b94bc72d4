use crate::types::DbId;

/// Domain errors shared by the storage and HTTP layers.
///
/// `Validation` and `InvalidFile` are user-correctable and end up as inline
/// form feedback. `NotFound` covers both "no such row" and "row owned by
/// somebody else" so callers cannot tell whether the row exists.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message to show next to a form, if this error is one the user can fix.
    pub fn form_message(&self) -> Option<&str> {
        match self {
            CoreError::Validation(msg) | CoreError::InvalidFile(msg) => Some(msg),
            _ => None,
        }
    }
}
