//! Read-only views computed on demand from already-fetched, owner-scoped
//! collections. Nothing here is persisted.

pub mod progress;
pub mod revision;
pub mod trends;
