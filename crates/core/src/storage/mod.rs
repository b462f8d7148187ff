//! Blob storage for record attachments using Apache OpenDAL.
//!
//! Vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! The soft-delete engine only needs `delete_file(url) -> bool` from here;
//! upload handlers additionally use `upload`.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;
