use serde::{Deserialize, Serialize};

/// Response wrapper used by every endpoint of the event service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// The service message, or `fallback` when the service left it blank.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.trim().is_empty() {
            fallback
        } else {
            &self.message
        }
    }
}
