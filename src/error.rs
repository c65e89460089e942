//! Error types and handling for the hotel finder

use thiserror::Error;

/// Main error type for the hotel finder
#[derive(Error, Debug)]
pub enum HotelFinderError {
    /// Request failed, timed out or could not connect
    #[error("Network error: {message}")]
    Network { message: String },

    /// Provider answered but had zero results
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Missing or unusable credential / setting
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Provider rejected the request or returned a body we could not read
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No strategy could produce a location for the query
    #[error("Could not determine a location for '{query}'")]
    LocationUnresolved { query: String },
}

impl HotelFinderError {
    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn location_unresolved<S: Into<String>>(query: S) -> Self {
        Self::LocationUnresolved {
            query: query.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            HotelFinderError::Network { .. } => {
                "Unable to reach the location services. Please check your internet connection."
                    .to_string()
            }
            HotelFinderError::NotFound { .. } => {
                "No results found for that search. Please try a different location.".to_string()
            }
            HotelFinderError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            HotelFinderError::Api { .. } => {
                "The location service returned an unexpected answer. Please try again.".to_string()
            }
            HotelFinderError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            HotelFinderError::LocationUnresolved { .. } => {
                "We couldn't work out where that is. Please enter an area name or address and try again."
                    .to_string()
            }
        }
    }
}

impl From<reqwest::Error> for HotelFinderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HotelFinderError::network(format!("request timed out: {err}"))
        } else if err.is_decode() {
            HotelFinderError::api(format!("failed to decode response: {err}"))
        } else if let Some(status) = err.status() {
            HotelFinderError::network(format!("request failed with status {status}"))
        } else {
            HotelFinderError::network(err.to_string())
        }
    }
}
