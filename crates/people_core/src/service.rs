//! PersonService — orchestration for the person registry.
//!
//! Creation runs enrichment → assembly → persistence. Reads, updates and
//! deletes go straight to the store. Errors propagate unchanged; the
//! HTTP boundary alone decides the status code.

use std::sync::Arc;

use serde::Serialize;

use crate::assembler::{assemble, validate_identity};
use crate::enrichment::{enrich, EnrichmentWarning};
use crate::ports::{DemographicLookup, PersonStore, Result};
use crate::types::*;

/// A newly stored person and any non-fatal enrichment problems.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedPerson {
    #[serde(flatten)]
    pub record: PersonRecord,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EnrichmentWarning>,
}

pub struct PersonService {
    store: Arc<dyn PersonStore>,
    lookup: Arc<dyn DemographicLookup>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStore>, lookup: Arc<dyn DemographicLookup>) -> Self {
        Self { store, lookup }
    }

    /// Enrich `identity` from the lookup services and persist the result.
    pub async fn create(&self, identity: Identity) -> Result<CreatedPerson> {
        tracing::debug!(name = %identity.name, "create person");
        validate_identity(&identity)?;

        let enrichment = enrich(self.lookup.as_ref(), &identity.name)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "enrichment failed"))?;

        let person = assemble(identity, enrichment.facts)?;
        let id = self
            .store
            .create(&person)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to store person"))?;

        tracing::info!(
            person_id = id,
            degraded = !enrichment.warnings.is_empty(),
            "person created"
        );
        Ok(CreatedPerson {
            record: person.into_record(id),
            warnings: enrichment.warnings,
        })
    }

    /// Replace identity fields; demographic and nationality data are kept.
    pub async fn update(&self, id: PersonId, identity: Identity) -> Result<PersonRecord> {
        tracing::debug!(person_id = id, "update person");
        validate_identity(&identity)?;
        let record = self
            .store
            .update(id, &identity)
            .await
            .inspect_err(|e| tracing::error!(person_id = id, error = %e, "update failed"))?;
        tracing::info!(person_id = id, "person updated");
        Ok(record)
    }

    pub async fn delete(&self, id: PersonId) -> Result<()> {
        tracing::debug!(person_id = id, "delete person");
        self.store
            .delete(id)
            .await
            .inspect_err(|e| tracing::error!(person_id = id, error = %e, "delete failed"))?;
        tracing::info!(person_id = id, "person deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: PersonId) -> Result<PersonRecord> {
        tracing::debug!(person_id = id, "get person");
        self.store
            .get_by_id(id)
            .await
            .inspect_err(|e| tracing::error!(person_id = id, error = %e, "get failed"))
    }

    pub async fn list(&self, filter: &PersonFilter, page: PageRequest) -> Result<PersonPage> {
        tracing::debug!(?filter, page = page.page(), per_page = page.per_page(), "list people");
        self.store
            .list(filter, page)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "list failed"))
    }
}
