//! Error types for pattern compilation and route resolution

use thiserror::Error;

/// Result alias used throughout the navigator
pub type Result<T> = std::result::Result<T, NavigatorError>;

/// Fatal errors raised while compiling patterns or resolving declarations
///
/// These abort the current resolution. Advisory conditions (conflicting
/// render strategies, location drift) are reported as
/// [`Warning`](crate::Warning) values instead and never surface here.
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// The pattern could not be turned into a matcher (bad custom group, etc.)
    #[error("invalid path pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A route, switch or redirect was resolved without an inherited context
    #[error("route declarations must be resolved inside a NavigationController")]
    OutsideController,

    /// Path generation needed a parameter that was not supplied
    #[error("missing value for parameter `{name}` in pattern `{pattern}`")]
    MissingParam { pattern: String, name: String },

    /// Path generation got a value its token pattern rejects
    #[error("value `{value}` for parameter `{name}` does not satisfy pattern `{pattern}`")]
    InvalidParam {
        pattern: String,
        name: String,
        value: String,
    },
}

impl NavigatorError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}
