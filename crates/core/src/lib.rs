//! Core business logic for the QMS backend.
//!
//! This crate contains pure domain logic with ZERO web or database
//! dependencies. Persistence is reached only through traits implemented by
//! the db crate.
//!
//! # Modules
//!
//! - `record` - Domain record types shared by all entity kinds
//! - `softdelete` - Soft-delete engine (mark deleted + audit + file cleanup)
//! - `audit` - Audit trail types and recorder contract
//! - `version` - File version labels and snapshot-before-replace tracking
//! - `auth` - Password hashing
//! - `storage` - Blob storage service (OpenDAL)

pub mod audit;
pub mod auth;
pub mod record;
pub mod softdelete;
pub mod storage;
pub mod version;
