//! # Injection Error Types
//!
//! Typed error handling for the cart injection engine.
//! Errors stay inside the engine: every strategy boundary converts them into
//! a failed `StrategyReport`, and `addToCartBulk` never surfaces them.

use thiserror::Error;

/// Core error type for all injection operations
#[derive(Debug, Error)]
pub enum InjectionError {
    /// A line item failed validation and was dropped from the batch
    #[error("Invalid line item: {reason}")]
    InvalidLineItem { reason: String },

    /// Configuration errors (bad selector table, malformed path)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The capability a strategy needs is not present on this page
    #[error("Strategy unavailable: {strategy}")]
    StrategyUnavailable { strategy: String },

    /// The host cart integration rejected or threw on a call
    #[error("Host cart call failed: {0}")]
    HostCall(String),

    /// A DOM API threw while the theme's controls were manipulated
    #[error("DOM error: {0}")]
    Dom(String),

    /// No navigable context, or the navigation itself failed
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The cart-updated event or toast could not be emitted
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl InjectionError {
    /// Create an invalid line item error
    pub fn invalid_item(reason: impl Into<String>) -> Self {
        InjectionError::InvalidLineItem {
            reason: reason.into(),
        }
    }

    /// Create a strategy unavailable error
    pub fn unavailable(strategy: impl Into<String>) -> Self {
        InjectionError::StrategyUnavailable {
            strategy: strategy.into(),
        }
    }

    /// Returns true for conditions that are normal on many storefronts
    /// and must not be reported as application errors.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            InjectionError::InvalidLineItem { .. } | InjectionError::StrategyUnavailable { .. }
        )
    }

    /// Stable label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            InjectionError::InvalidLineItem { .. } => "invalid_line_item",
            InjectionError::Configuration(_) => "configuration",
            InjectionError::StrategyUnavailable { .. } => "strategy_unavailable",
            InjectionError::HostCall(_) => "host_call",
            InjectionError::Dom(_) => "dom",
            InjectionError::Navigation(_) => "navigation",
            InjectionError::Notification(_) => "notification",
            InjectionError::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for InjectionError {
    fn from(err: serde_json::Error) -> Self {
        InjectionError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for InjectionError {
    fn from(err: toml::de::Error) -> Self {
        InjectionError::Configuration(err.to_string())
    }
}

/// Result type alias for injection operations
pub type InjectionResult<T> = Result<T, InjectionError>;
