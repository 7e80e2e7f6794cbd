//! people_core — domain types, port traits and orchestration for the person registry.
//!
//! Storage and the third-party demographic services sit behind the
//! [`ports::PersonStore`] and [`ports::DemographicLookup`] traits; the
//! Postgres adapter and the HTTP lookup client live in their own crates.

pub mod assembler;
pub mod enrichment;
pub mod error;
pub mod ports;
pub mod service;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use enrichment::{enrich, Enrichment, EnrichmentFacts, EnrichmentWarning};
pub use error::{LookupKind, PeopleError};
pub use ports::{DemographicLookup, PersonStore, Result};
pub use service::{CreatedPerson, PersonService};
pub use types::*;
