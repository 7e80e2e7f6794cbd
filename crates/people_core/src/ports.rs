//! Port traits implemented by the storage and lookup adapters.
//! Core logic depends only on these traits.

use async_trait::async_trait;

use crate::error::PeopleError;
use crate::types::*;

pub type Result<T> = std::result::Result<T, PeopleError>;

/// Transactional storage for person records.
///
/// Every operation that names an existing id probes for it first and
/// returns [`PeopleError::NotFound`] when it is absent.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Insert identity, info and nationality rows atomically.
    /// Returns the generated identifier.
    async fn create(&self, person: &NewPerson) -> Result<PersonId>;

    /// Replace the identity fields only and return the current composite.
    async fn update(&self, id: PersonId, identity: &Identity) -> Result<PersonRecord>;

    /// Remove nationality, info and identity rows together.
    async fn delete(&self, id: PersonId) -> Result<()>;

    async fn get_by_id(&self, id: PersonId) -> Result<PersonRecord>;

    /// One page of matching records plus the total match count.
    async fn list(&self, filter: &PersonFilter, page: PageRequest) -> Result<PersonPage>;
}

/// Name-keyed demographic lookups backed by third-party services.
#[async_trait]
pub trait DemographicLookup: Send + Sync {
    async fn fetch_age(&self, name: &str) -> Result<i32>;

    /// Gender label and its probability.
    async fn fetch_gender(&self, name: &str) -> Result<(String, f64)>;

    /// Likely nationalities. An empty list is a valid answer.
    async fn fetch_nationalities(&self, name: &str) -> Result<Vec<NationalityCandidate>>;
}
