//! Name-based demographic enrichment over HTTP.
//!
//! - [`types`]: response payloads of agify.io, genderize.io and nationalize.io
//! - [`client`]: reqwest client implementing `people_core::DemographicLookup`

pub mod client;
pub mod types;

pub use client::{LookupEndpoints, NameLookupClient};
