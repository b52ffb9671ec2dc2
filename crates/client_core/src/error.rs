use std::fmt;

use thiserror::Error;

pub const INVALID_EVENT_DATA: &str = "Invalid event data format received.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Archive,
    Delete,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Archive => "archive",
            Operation::Delete => "delete",
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch events",
            Operation::Create => "Failed to create event",
            Operation::Archive => "Failed to archive event",
            Operation::Delete => "Failed to delete event",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a single event service call. `Display` is always the
/// user-facing text; transport causes are kept in `source` for logging.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("{message}")]
    Remote { operation: Operation, message: String },
    #[error("{}", .operation.fallback_message())]
    Transport {
        operation: Operation,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{}", INVALID_EVENT_DATA)]
    MalformedResponse { operation: Operation, detail: String },
}

impl ApiClientError {
    pub(crate) fn transport(
        operation: Operation,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }

    pub(crate) fn malformed(operation: Operation, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            detail: detail.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Remote { operation, .. }
            | Self::Transport { operation, .. }
            | Self::MalformedResponse { operation, .. } => *operation,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
