//! Error types for Presento

use thiserror::Error;

/// Presento error types
#[derive(Debug, Error)]
pub enum PresentoError {
    /// A transformer named a property naming strategy that is not registered.
    #[error("Unknown naming strategy: your given method {name} does not exist")]
    UnknownNamingStrategy {
        /// Strategy name that failed to resolve
        name: String,
    },
    /// A nested projection rule referenced an unregistered presenter.
    #[error("Unknown presenter: no presenter named '{name}' is registered")]
    UnknownPresenter {
        /// Presenter identifier from the rule
        name: String,
    },
    /// A nested presenter was given the wrong number of extra arguments.
    #[error("Presenter '{presenter}' expects {min}..={max} extra arguments, got {found}")]
    PresenterArity {
        /// Presenter identifier from the rule
        presenter: String,
        /// Minimum accepted extra arguments
        min: usize,
        /// Maximum accepted extra arguments
        max: usize,
        /// Extra arguments supplied by the rule
        found: usize,
    },
    /// A presenter referenced an unregistered transformer.
    #[error("Unknown transformer: no transformer named '{name}' is registered")]
    UnknownTransformer {
        /// Transformer name that failed to resolve
        name: String,
    },
    /// Schema entry has a shape that cannot be compiled into a rule.
    #[error("Invalid rule for key '{key}': {reason}")]
    InvalidRule {
        /// Output key of the offending entry
        key: String,
        /// Explanation of why the entry was rejected
        reason: String,
    },
    /// Nested projection went deeper than the configured limit.
    #[error(
        "Nesting depth limit exceeded: presenter '{presenter}' reached depth {depth} (max: {max_depth}).\n\
         \n\
         This usually means a schema refers back to its own presenter."
    )]
    NestingDepthExceeded {
        /// Presenter that would have been instantiated
        presenter: String,
        /// Depth at which the presenter would run
        depth: usize,
        /// Maximum depth allowed
        max_depth: usize,
    },
    /// A presenter with the same name is already registered.
    #[error("Presenter already registered: a presenter named '{name}' is already registered")]
    PresenterAlreadyRegistered {
        /// Conflicting presenter name
        name: String,
    },
    /// A transformer with the same name is already registered.
    #[error("Transformer already registered: a transformer named '{name}' is already registered")]
    TransformerAlreadyRegistered {
        /// Conflicting transformer name
        name: String,
    },
    /// A naming strategy with the same name is already registered.
    #[error("Naming strategy already registered: a strategy named '{name}' is already registered")]
    NamingStrategyAlreadyRegistered {
        /// Conflicting strategy name
        name: String,
    },
    /// Configured limits exceed the hard maximums.
    #[error("Configuration exceeds hard limits: {reason}")]
    ConfigurationExceedsHardLimits {
        /// Description of which limit was exceeded
        reason: String,
    },
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PresentoError {
    /// Check if this error comes from resolving a nested presenter
    pub fn is_factory_resolution(&self) -> bool {
        matches!(
            self,
            PresentoError::UnknownPresenter { .. } | PresentoError::PresenterArity { .. }
        )
    }

    /// Check if this error is a construction-time misconfiguration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PresentoError::UnknownNamingStrategy { .. }
                | PresentoError::UnknownTransformer { .. }
                | PresentoError::ConfigurationExceedsHardLimits { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PresentoError>;
