//! Error types for key-value store operations.
//!
//! Errors carry a structured [`ErrorContext`] naming the operation and the key
//! involved, for debugging and logging.

use std::fmt;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Structured context for store errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load", "save")
    pub operation: Option<String>,
    /// The storage key involved
    pub key: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether retrying the operation may succeed
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref key) = self.key {
            parts.push(format!("key={}", key));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the underlying medium failed.
    #[error("Storage I/O error: {message} {context}")]
    Io {
        message: String,
        context: ErrorContext,
    },

    /// A value could not be encoded or decoded as JSON.
    #[error("Serialization error: {message} {context}")]
    Serialization {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// The store is not accepting operations.
    #[error("Store unavailable: {message} {context}")]
    Unavailable {
        message: String,
        context: ErrorContext,
    },
}

impl StoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Io { context, .. }
            | Self::Serialization { context, .. }
            | Self::Configuration { context, .. }
            | Self::Unavailable { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Io { context, .. }
            | Self::Serialization { context, .. }
            | Self::Configuration { context, .. }
            | Self::Unavailable { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add or update the key in the error context.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.context_mut().key = Some(key.into());
        self
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        let context = ErrorContext::default().with_details(format!("io_error_kind={:?}", err.kind()));
        let context = if err.kind() == std::io::ErrorKind::Interrupted {
            context.retryable()
        } else {
            context
        };
        StoreError::Io {
            message: err.to_string(),
            context,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::serialization(err.to_string())
    }
}
