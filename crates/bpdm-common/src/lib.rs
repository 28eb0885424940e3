//! Shared business-partner payload DTOs.
//!
//! The Gate ingests these records from data providers and the Pool stores the
//! golden, BPN-assigned versions.  Both API crates exchange the same payload
//! shapes, so they live here rather than in either service crate.

pub mod model;

pub use model::{AddressDto, LegalEntityDto, PartnerType, SiteDto};
