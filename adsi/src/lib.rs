//! # adsi
//!
//! Active Directory Service Interfaces (ADSI) bindings for Rust.
//!
//! Every ADSI interface is held by a handle type ([`Container`],
//! [`Members`], [`ObjectIter`], [`Object`], [`Group`], [`Client`]) that
//! owns exactly one COM reference and one token on the process-wide
//! [`ComRuntime`]. Handles are `Send + Sync`; each serializes its own
//! operations and `close()` is idempotent. Operations on a closed handle
//! fail with [`AdsiError::Closed`] without touching COM.
//!
//! The COM apartment is started when the first handle is created and shut
//! down when the last one is closed, so callers never initialize COM
//! themselves.
//!
//! ## Modules
//! - [`api`]: GUIDs and thin wrappers over the raw COM surface
//! - [`backend`]: the traits handle types are generic over, and their COM
//!   implementations

pub mod api;
pub mod backend;
mod client;
mod com_guard;
mod container;
mod credentials;
mod error;
mod group;
mod handle;
mod iter;
mod members;
mod object;
mod runtime;

#[cfg(test)]
mod testing;

pub use api::guid::*;
pub use client::Client;
pub use com_guard::ComGuard;
pub use container::Container;
pub use credentials::{AuthFlags, Credentials};
pub use error::{AdsiError, AdsiResult, codes, format_hresult, friendly_hresult_hint};
pub use group::Group;
pub use iter::ObjectIter;
pub use members::Members;
pub use object::Object;
pub use runtime::{ComRuntime, RuntimeToken};
pub use windows::core::HRESULT;
