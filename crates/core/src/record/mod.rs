//! Domain record types shared by all QMS entity kinds.
//!
//! Every record type (process, risk entry, objective, ...) shares the same
//! structural shape: identity, business-area scoping, domain fields, an
//! optional attached-file reference, and soft-delete provenance.

mod error;
mod types;

pub use error::RecordError;
pub use types::{AccessScope, FileRef, NewRecord, Record, RecordKind, UpdateRecord};
