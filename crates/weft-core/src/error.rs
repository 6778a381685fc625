//! Foundation error types

/// Errors from identity parsing.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The supplied bytes do not encode a valid public key.
    #[error("invalid public key: {0}")]
    InvalidKey(String),
}
