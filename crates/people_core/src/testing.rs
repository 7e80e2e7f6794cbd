//! In-memory test doubles for the store and lookup ports.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{LookupKind, PeopleError};
use crate::ports::{DemographicLookup, PersonStore, Result};
use crate::types::*;

#[derive(Default)]
struct MemoryState {
    next_id: PersonId,
    people: BTreeMap<PersonId, PersonRecord>,
}

/// `PersonStore` over a `BTreeMap`, ordered by id like the Postgres adapter.
#[derive(Default)]
pub struct InMemoryPersonStore {
    state: RwLock<MemoryState>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.people.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn create(&self, person: &NewPerson) -> Result<PersonId> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = state.next_id;
        state.people.insert(id, person.clone().into_record(id));
        Ok(id)
    }

    async fn update(&self, id: PersonId, identity: &Identity) -> Result<PersonRecord> {
        let mut state = self.state.write().await;
        let record = state.people.get_mut(&id).ok_or(PeopleError::NotFound(id))?;
        record.identity = identity.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: PersonId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .people
            .remove(&id)
            .map(|_| ())
            .ok_or(PeopleError::NotFound(id))
    }

    async fn get_by_id(&self, id: PersonId) -> Result<PersonRecord> {
        let state = self.state.read().await;
        state
            .people
            .get(&id)
            .cloned()
            .ok_or(PeopleError::NotFound(id))
    }

    async fn list(&self, filter: &PersonFilter, page: PageRequest) -> Result<PersonPage> {
        let state = self.state.read().await;
        let matching: Vec<&PersonRecord> = state
            .people
            .values()
            .filter(|r| filter.matches(r))
            .collect();
        let people = matching
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|r| (*r).clone())
            .collect();
        Ok(PersonPage {
            people,
            total: matching.len() as i64,
            page,
        })
    }
}

/// `DemographicLookup` returning fixed answers, optionally failing one lookup.
pub struct StaticLookup {
    age: i32,
    gender: String,
    gender_probability: f64,
    nationalities: Vec<NationalityCandidate>,
    failing: Option<LookupKind>,
    calls: AtomicUsize,
}

impl StaticLookup {
    pub fn new(age: i32, gender: impl Into<String>, gender_probability: f64) -> Self {
        Self {
            age,
            gender: gender.into(),
            gender_probability,
            nationalities: Vec::new(),
            failing: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_nationalities(mut self, nationalities: Vec<NationalityCandidate>) -> Self {
        self.nationalities = nationalities;
        self
    }

    /// Make `lookup` fail with a request error.
    pub fn failing(mut self, lookup: LookupKind) -> Self {
        self.failing = Some(lookup);
        self
    }

    /// Total lookups issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, lookup: LookupKind) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing == Some(lookup) {
            return Err(PeopleError::EnrichmentRequest {
                lookup,
                message: "lookup unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DemographicLookup for StaticLookup {
    async fn fetch_age(&self, _name: &str) -> Result<i32> {
        self.check(LookupKind::Age)?;
        Ok(self.age)
    }

    async fn fetch_gender(&self, _name: &str) -> Result<(String, f64)> {
        self.check(LookupKind::Gender)?;
        Ok((self.gender.clone(), self.gender_probability))
    }

    async fn fetch_nationalities(&self, _name: &str) -> Result<Vec<NationalityCandidate>> {
        self.check(LookupKind::Nationality)?;
        Ok(self.nationalities.clone())
    }
}
