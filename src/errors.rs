// ABOUTME: Unified error handling for the periodization engine
// ABOUTME: Standard error codes, context attachment, and HTTP status mapping for transport layers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling System
//!
//! Centralized error types for the engine. Defines standard error codes and
//! an [`AppError`] carrier so every module and the embedding transport layer
//! report failures consistently.
//!
//! Scoring and analysis functions never surface errors for sparse or empty
//! data; they degrade to documented defaults. Orchestration functions validate
//! preconditions up front and fail atomically.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input failed boundary validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A primary input value is outside its documented range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3001,
    /// Volume landmark violates the mev <= mav <= mrv ordering
    #[serde(rename = "INVALID_LANDMARK")]
    InvalidLandmark = 3002,

    // Resource management (4000-4999)
    /// Mesocycle, landmark, exercise, or template not found
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// A resource with this identity already exists
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,
    /// Optimistic version check failed on a landmark write
    #[serde(rename = "CONCURRENT_MODIFICATION")]
    ConcurrentModification = 4002,
    /// Sessions for this mesocycle week were already generated
    #[serde(rename = "DUPLICATE_GENERATION")]
    DuplicateGeneration = 4003,

    // External store (5000-5999)
    /// Backing store unavailable or returned an error
    #[serde(rename = "STORE_UNAVAILABLE")]
    StoreUnavailable = 5000,
    /// Backing store call exceeded its deadline
    #[serde(rename = "STORE_TIMEOUT")]
    StoreTimeout = 5001,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::ValueOutOfRange | Self::InvalidLandmark => 400,
            Self::ResourceNotFound => 404,
            Self::ResourceAlreadyExists
            | Self::ConcurrentModification
            | Self::DuplicateGeneration => 409,
            Self::StoreUnavailable | Self::StoreTimeout => 502,
            Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidLandmark => "Volume landmark ordering (MEV <= MAV <= MRV) is violated",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::ConcurrentModification => "The resource was modified by a concurrent operation",
            Self::DuplicateGeneration => "Workout sessions for this week already exist",
            Self::StoreUnavailable => "The backing store is unavailable",
            Self::StoreTimeout => "The backing store call timed out",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input at a system boundary
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// A rating or level outside its documented range
    pub fn out_of_range(field: &str, value: impl fmt::Display, range: &str) -> Self {
        Self::new(
            ErrorCode::ValueOutOfRange,
            format!("{field} value {value} is outside {range}"),
        )
    }

    /// Landmark ordering violation
    pub fn invalid_landmark(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidLandmark, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Conflicting resource already exists
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceAlreadyExists,
            format!("{} already exists", resource.into()),
        )
    }

    /// Optimistic concurrency check failure
    pub fn concurrent_modification(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrentModification, message)
    }

    /// Sessions for a mesocycle week already generated
    #[must_use]
    pub fn duplicate_generation(mesocycle_id: Uuid, week: u32) -> Self {
        Self::new(
            ErrorCode::DuplicateGeneration,
            format!("sessions for mesocycle {mesocycle_id} week {week} already exist"),
        )
        .with_resource_id(mesocycle_id.to_string())
    }

    /// Backing store failure
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Backing store deadline exceeded
    #[must_use]
    pub fn store_timeout(operation: &str) -> Self {
        Self::new(
            ErrorCode::StoreTimeout,
            format!("store call '{operation}' exceeded its deadline"),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Conversion from `anyhow::Error` (the store-provider boundary) to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::StoreUnavailable, error.to_string())
                .with_details(serde_json::json!({ "source": source.to_string() })),
            None => Self::new(ErrorCode::StoreUnavailable, error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::DuplicateGeneration.http_status(), 409);
        assert_eq!(ErrorCode::StoreTimeout.http_status(), 502);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_app_error_creation() {
        let user = Uuid::new_v4();
        let error = AppError::not_found("mesocycle").with_user_id(user);

        assert_eq!(error.code, ErrorCode::ResourceNotFound);
        assert_eq!(error.context.user_id, Some(user));
    }

    #[test]
    fn test_error_code_serde_names() {
        let json = serde_json::to_string(&ErrorCode::ConcurrentModification).unwrap();
        assert_eq!(json, "\"CONCURRENT_MODIFICATION\"");
    }

    #[test]
    fn test_out_of_range_message() {
        let error = AppError::out_of_range("pump_quality", 14, "[1, 10]");
        assert_eq!(error.code, ErrorCode::ValueOutOfRange);
        assert!(error.message.contains("pump_quality"));
        assert!(error.message.contains("14"));
    }
}
