//! Async Rust client library for the VictorOps incident management and
//! on-call scheduling API.
//!
//! Every operation is a single request/response round trip against one
//! of two REST surfaces — the versioned public API (identity-header
//! auth) and the internal portal API (HTTP Basic auth) — sharing one
//! authenticated transport.
//!
//! # Modules
//!
//! - [`client`] — `VoClient`, the dual-surface authenticated HTTP
//!   wrapper.
//! - [`error`] — typed error hierarchy (`VoError`) for all operations.
//! - [`incidents`] — incident records and lifecycle operations
//!   (list, create, reroute, ack, resolve).
//! - [`oncall`] — team schedules and on-call override management.
//! - [`timestamp`] — the portal's epoch-millisecond timestamp codec.
//!
//! # Quick Start
//!
//! ```ignore
//! use victorops::client::VoClient;
//! use victorops::incidents::{self, Target};
//!
//! let client = VoClient::new("username", "api-id", "api-key", "password");
//! let created = incidents::create_incident(
//!     &client,
//!     "disk full on db-1",
//!     "root volume at 98%",
//!     &[Target::user("alice")],
//! )
//! .await?;
//! let open = incidents::list_incidents(&client).await?;
//! ```
//!
//! The client is immutable after construction and can be shared across
//! tasks by reference; the library imposes no locking, retries, or
//! timeouts of its own (supply deadlines via the underlying transport
//! if needed).

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod incidents;
pub mod oncall;
pub mod timestamp;
