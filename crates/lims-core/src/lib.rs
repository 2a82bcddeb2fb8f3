#![doc = include_str!("../README.md")]

//! ## Concurrency model
//!
//! Every load and save is one awaited, sequential HTTP call; the crate adds
//! no retries, no timeouts beyond the transport's, and no background work.
//! The registry behind [`Lims`] is protected by a lock, so the one instance
//! per URI guarantee also holds when a `Lims` clone is shared across tasks.

//! Client facade for the LIMS server.
pub mod client;
mod collection;
mod entity;
#[allow(missing_docs)]
pub mod error;
mod query;
mod transport;

pub use client::{ClientSettings, Lims};
pub use entity::{Entity, EntityExt, EntityHandle};
pub use error::{
    ConflictError, LimsError, NotFoundError, ParseError, TransportError, ValidationError,
};
pub use query::QueryParams;
pub use transport::ApiConfiguration;
