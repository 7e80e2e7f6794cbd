//! Record assembly: identity + enrichment facts → persistable person.

use crate::enrichment::EnrichmentFacts;
use crate::error::PeopleError;
use crate::types::{DemographicInfo, Identity, NewPerson};

/// Reject identities that cannot be enriched or stored.
pub fn validate_identity(identity: &Identity) -> Result<(), PeopleError> {
    if identity.name.trim().is_empty() {
        return Err(PeopleError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// Combine an identity with its enrichment facts. No I/O.
pub fn assemble(identity: Identity, facts: EnrichmentFacts) -> Result<NewPerson, PeopleError> {
    validate_identity(&identity)?;
    Ok(NewPerson {
        identity,
        info: DemographicInfo {
            age: facts.age,
            gender: facts.gender,
            gender_probability: facts.gender_probability,
        },
        nationality: facts.nationalities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NationalityCandidate;

    fn facts() -> EnrichmentFacts {
        EnrichmentFacts {
            age: 30,
            gender: "female".into(),
            gender_probability: 0.97,
            nationalities: vec![
                NationalityCandidate::new("US", 0.6),
                NationalityCandidate::new("GB", 0.3),
            ],
        }
    }

    #[test]
    fn assembles_all_fields() {
        let person = assemble(Identity::new("Alice", "Smith", ""), facts()).unwrap();

        assert_eq!(person.identity.name, "Alice");
        assert_eq!(person.info.age, 30);
        assert_eq!(person.info.gender, "female");
        assert_eq!(person.info.gender_probability, 0.97);
        assert_eq!(
            person
                .nationality
                .iter()
                .map(|n| n.country_id.as_str())
                .collect::<Vec<_>>(),
            vec!["US", "GB"]
        );
    }

    #[test]
    fn blank_name_is_a_validation_error() {
        let err = assemble(Identity::new("   ", "Smith", ""), facts()).unwrap_err();
        assert!(matches!(err, PeopleError::Validation(_)));
    }
}
