#![forbid(unsafe_code)]

//! Attachable reactive controllers for [`tether_host`] hosts.
//!
//! Two units that extend a host's lifecycle without the host knowing their
//! internals:
//!
//! - [`MemoController`]: a lazily recomputed, dependency-checked memoized
//!   value.
//! - [`SlotController`]: a filtered observer over the host's slotted
//!   content that requests host updates on relevant changes.

pub mod array;
pub mod memo;
pub mod slot;

pub use memo::MemoController;
pub use slot::SlotController;
