// ABOUTME: Store call policy: per-call deadlines and the single-retry backoff
// ABOUTME: A store outage fails the whole operation cleanly; no partial updates are applied
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Store Call Policy Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadlines and retry policy for calls into the backing store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Per-call deadline in milliseconds
    pub call_timeout_ms: u64,
    /// Backoff before the single retry, milliseconds
    pub retry_backoff_ms: u64,
}

impl StoreConfig {
    /// Per-call deadline as a [`Duration`]
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Retry backoff as a [`Duration`]
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 5_000,
            retry_backoff_ms: 200,
        }
    }
}
