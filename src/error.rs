//! Error types and handling for the `OfficeMap` application

use thiserror::Error;

/// Main error type for the `OfficeMap` application
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfficeMapError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The address search service could not be reached
    #[error("Network error: {message}")]
    Connectivity { message: String },

    /// The address search request did not complete in time
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The address search service answered with a non-success status
    #[error("Address search returned HTTP {status}")]
    Protocol { status: u16 },

    /// The response body was not a list of address features
    #[error("Malformed address search response: {message}")]
    Decode { message: String },

    /// No features to aggregate
    #[error("No results found for '{place}'")]
    EmptyResult { place: String },

    /// I/O operation errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for OfficeMapError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
        }
    }
}

impl OfficeMapError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new connectivity error
    pub fn connectivity<S: Into<String>>(message: S) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new empty-result error
    pub fn empty_result<S: Into<String>>(place: S) -> Self {
        Self::EmptyResult {
            place: place.into(),
        }
    }

    /// True for failures to reach the service at all, timeouts included
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::Timeout { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            OfficeMapError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            OfficeMapError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            OfficeMapError::Connectivity { .. } => {
                "Unable to connect to the address search service. Please check your internet connection."
                    .to_string()
            }
            OfficeMapError::Timeout { seconds } => {
                format!("The address search service did not answer within {seconds} seconds.")
            }
            OfficeMapError::Protocol { status } => {
                format!("The address search service rejected the request (HTTP {status}).")
            }
            OfficeMapError::Decode { .. } => {
                "The address search service sent data that could not be read.".to_string()
            }
            OfficeMapError::EmptyResult { place } => {
                format!("No locations found for '{place}'.")
            }
            OfficeMapError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
