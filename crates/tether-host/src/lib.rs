#![forbid(unsafe_code)]

//! Host capability layer: controller attachment, lifecycle delivery,
//! update-request coalescing, and the slot content model.

pub mod content;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;

pub use content::{Element, Node};
pub use controller::Controller;
pub use error::HostError;
pub use events::Subscription;
pub use host::Host;
