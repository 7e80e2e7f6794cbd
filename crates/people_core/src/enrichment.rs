//! Enrichment fan-out.
//!
//! Runs the three demographic lookups for a name concurrently. Age and
//! gender are required; a failed nationality lookup degrades to an empty
//! list and is reported as a warning instead of an error.

use serde::Serialize;

use crate::error::LookupKind;
use crate::ports::{DemographicLookup, Result};
use crate::types::NationalityCandidate;

/// Demographic facts gathered for one name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentFacts {
    pub age: i32,
    pub gender: String,
    pub gender_probability: f64,
    pub nationalities: Vec<NationalityCandidate>,
}

/// A lookup that failed without aborting enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentWarning {
    pub lookup: String,
    pub message: String,
}

impl EnrichmentWarning {
    pub fn new(lookup: LookupKind, message: impl Into<String>) -> Self {
        Self {
            lookup: lookup.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub facts: EnrichmentFacts,
    pub warnings: Vec<EnrichmentWarning>,
}

impl Enrichment {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Fetch age, gender and nationalities for `name`.
pub async fn enrich(lookup: &dyn DemographicLookup, name: &str) -> Result<Enrichment> {
    let (age, gender, nationalities) = tokio::join!(
        lookup.fetch_age(name),
        lookup.fetch_gender(name),
        lookup.fetch_nationalities(name),
    );

    let age = age?;
    let (gender, gender_probability) = gender?;

    let mut warnings = Vec::new();
    let nationalities = match nationalities {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(name = %name, error = %e, "nationality lookup failed, continuing without it");
            warnings.push(EnrichmentWarning::new(LookupKind::Nationality, e.to_string()));
            Vec::new()
        }
    };

    Ok(Enrichment {
        facts: EnrichmentFacts {
            age,
            gender,
            gender_probability,
            nationalities,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeopleError;
    use crate::testing::StaticLookup;

    #[tokio::test]
    async fn collects_all_three_facts() {
        let lookup = StaticLookup::new(30, "female", 0.97)
            .with_nationalities(vec![NationalityCandidate::new("US", 0.6)]);

        let enrichment = enrich(&lookup, "Alice").await.unwrap();

        assert!(!enrichment.is_degraded());
        assert_eq!(enrichment.facts.age, 30);
        assert_eq!(enrichment.facts.gender, "female");
        assert_eq!(enrichment.facts.nationalities.len(), 1);
    }

    #[tokio::test]
    async fn nationality_failure_is_a_warning() {
        let lookup = StaticLookup::new(41, "male", 0.88).failing(LookupKind::Nationality);

        let enrichment = enrich(&lookup, "Bob").await.unwrap();

        assert!(enrichment.is_degraded());
        assert!(enrichment.facts.nationalities.is_empty());
        assert_eq!(enrichment.warnings.len(), 1);
        assert_eq!(enrichment.warnings[0].lookup, "nationality");
        assert_eq!(enrichment.facts.age, 41);
    }

    #[tokio::test]
    async fn age_failure_is_fatal() {
        let lookup = StaticLookup::new(41, "male", 0.88).failing(LookupKind::Age);

        let err = enrich(&lookup, "Bob").await.unwrap_err();

        assert!(matches!(
            err,
            PeopleError::EnrichmentRequest {
                lookup: LookupKind::Age,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn gender_failure_is_fatal() {
        let lookup = StaticLookup::new(41, "male", 0.88).failing(LookupKind::Gender);

        let err = enrich(&lookup, "Bob").await.unwrap_err();

        assert_eq!(err.lookup(), Some(LookupKind::Gender));
    }
}
