//! BPDM Pool API: DTOs and HTTP client.
//!
//! The Pool is the golden-record service.  It stores deduplicated,
//! BPN-assigned master data and exposes batch create/update endpoints per
//! partner type.  BPN assignment happens exactly once, at creation, and is
//! permanent.

pub mod client;
pub mod error;
pub mod model;

pub use client::PoolClient;
pub use error::{PoolClientError, PoolClientResult};
