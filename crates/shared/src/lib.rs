//! Shared types, errors, and configuration for the QMS backend.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - JWT claims and token service
//! - Request/response payloads shared between layers
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
