//! Storage-engine surface for the colfs harness
//!
//! This crate defines the engine collaborator the scenarios exercise:
//! - StorageEngine: the create/open/close/query/delete contract
//! - FileHandle: group-bound handle to an open container
//! - CollectiveFileEngine: file-backed engine that persists policy flags
//!   in a CRC-protected container header and synchronizes every call on
//!   the handle's bound group
//! - format: the on-disk container header layout

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collective;
pub mod format;
pub mod traits;

pub use collective::CollectiveFileEngine;
pub use format::{ContainerHeader, CONTAINER_FORMAT_VERSION, CONTAINER_HEADER_SIZE, CONTAINER_MAGIC};
pub use traits::{FileHandle, StorageEngine};
