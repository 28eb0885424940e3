//! BPDM Gate API: DTOs and HTTP client.
//!
//! The Gate is the ingestion-side service of the BPDM suite.  It holds
//! provider-submitted business-partner records, an append-only changelog of
//! their modifications, and the sharing-state ledger that tracks whether and
//! how each record was synchronized into the Pool.

pub mod client;
pub mod error;
pub mod model;

pub use client::GateClient;
pub use error::{GateClientError, GateClientResult};
