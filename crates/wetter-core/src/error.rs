//! Shared error types for the Wetter workspace.
//!
//! Each error exposes `user_message()` for display; `Display` keeps the
//! technical detail for logs.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Errors from the key-value preference store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Io(_) => "Could not save your settings. Please try again.",
            StorageError::Serialization(_) => "Stored settings are unreadable.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let messages = [
            ConfigError::Invalid("x".into()).user_message(),
            StorageError::Serialization("bad".into()).user_message(),
            StorageError::Io(std::io::Error::other("disk")).user_message(),
        ];

        for message in messages {
            assert!(!message.is_empty());
        }
    }

    #[test]
    fn test_display_keeps_detail() {
        let err = ConfigError::Invalid("weather.units: Unknown unit system".into());
        assert!(err.to_string().contains("weather.units"));
    }
}
