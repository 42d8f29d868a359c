use thiserror::Error;

/// Errors raised while building or transforming a [`crate::profile::Profile`].
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    /// Chainage and value sequences are not parallel.
    #[error("expected as many values as chainages, got {chainages} chainages and {values} values")]
    LengthMismatch { chainages: usize, values: usize },

    /// Structure offset must be a finite positive distance.
    #[error("structure offset must be finite and positive, got {0}")]
    InvalidOffset(f64),

    /// Profile name is empty or only whitespace.
    #[error("profile name must not be blank")]
    BlankName,

    /// Profile name clashes with the chainage argument name.
    #[error("profile name '{0}' is reserved for the chainage argument")]
    ReservedName(String),
}
