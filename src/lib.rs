// ABOUTME: Main library entry point for the periodization engine
// ABOUTME: Exposes feedback scoring, volume progression, load advice, and mesocycle orchestration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Periodization Engine
//!
//! An auto-regulating training periodization engine built around volume
//! landmarks (MV, MEV, MAV, MRV) and subjective post-workout feedback.
//!
//! ## Features
//!
//! - **Feedback scoring**: Turns 1-10 session ratings into recovery,
//!   adaptation, and fatigue scores
//! - **Fatigue analysis**: Rolling-window trend detection with deload
//!   recommendations
//! - **Volume progression**: Three-phase mesocycle volume targets
//!   (accumulation, intensification, deload) bounded by each lifter's
//!   landmarks
//! - **Set distribution**: Strategy-driven allocation of weekly sets across
//!   exercises and training days
//! - **Load progression**: RPE/RIR-driven weight and rep prescriptions
//! - **Orchestration**: Idempotent week advancement with per-user locking
//!   and optimistic landmark versioning
//!
//! ## Architecture
//!
//! The engine is layered:
//! - **Models**: Shared data types and validation
//! - **Config**: Tunable coefficients with sane defaults
//! - **Store**: Async persistence boundary with an in-memory implementation
//! - **Engine**: Pure calculators plus the stateful orchestrator
//! - **Services**: The facade an API layer or scheduler talks to
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use periodization_engine::config::EngineConfig;
//! use periodization_engine::services::EngineService;
//! use periodization_engine::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> periodization_engine::errors::AppResult<()> {
//!     let service = EngineService::new(MemoryStore::new(), EngineConfig::default());
//!     let user = uuid::Uuid::new_v4();
//!     let mesocycle = service
//!         .create_mesocycle(user, chrono::Utc::now(), 6)
//!         .await?;
//!     println!("mesocycle {} started", mesocycle.id);
//!     Ok(())
//! }
//! ```

/// Tunable engine configuration with defaults
pub mod config;
/// Core calculators and the mesocycle orchestrator
pub mod engine;
/// Error taxonomy shared across the crate
pub mod errors;
/// Structured logging setup
pub mod logging;
/// Shared data types and validation
pub mod models;
/// Public service facade
pub mod services;
/// Persistence boundary and in-memory store
pub mod store;
