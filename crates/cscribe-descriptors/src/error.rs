use cscribe_core::ConversionError;
use thiserror::Error;

/// Descriptor parameters rejected before the backend is ever called.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("At least one MBTR term must be specified.")]
    NoTerms,

    #[error("mbtr_{term} uses different elems than the preceding terms")]
    InconsistentElements { term: usize },

    #[error("{kind} does not support mbtr_{term}")]
    UnsupportedTerm { kind: &'static str, term: usize },

    #[error("Geometry function {0} unknown.")]
    UnknownGeometryFunction(String),

    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid descriptor configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Rejects zero, negative and NaN values.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, format!("{} is not positive", value)))
    }
}

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Failure reported by the descriptor backend, passed through untouched.
    #[error(transparent)]
    Backend(anyhow::Error),
}
