//! Person registry domain types.

use serde::{Deserialize, Serialize};

use crate::error::PeopleError;

/// Storage-assigned person identifier (`people.id`).
pub type PersonId = i32;

/// Name / surname / patronymic triple identifying a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
}

impl Identity {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        patronymic: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            patronymic: patronymic.into(),
        }
    }
}

/// Age and gender guess for a person, one row per identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicInfo {
    pub age: i32,
    pub gender: String,
    pub gender_probability: f64,
}

/// One likely country of origin with its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalityCandidate {
    pub country_id: String,
    pub probability: f64,
}

impl NationalityCandidate {
    pub fn new(country_id: impl Into<String>, probability: f64) -> Self {
        Self {
            country_id: country_id.into(),
            probability,
        }
    }
}

/// A fully enriched person that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    pub identity: Identity,
    pub info: DemographicInfo,
    pub nationality: Vec<NationalityCandidate>,
}

impl NewPerson {
    /// Attach the identifier storage assigned on insert.
    pub fn into_record(self, id: PersonId) -> PersonRecord {
        PersonRecord {
            id,
            identity: self.identity,
            info: self.info,
            nationality: self.nationality,
        }
    }
}

/// Composite person record: identity, demographic info and nationality candidates.
///
/// Serialises flat, e.g.
/// `{"id":1,"name":"Alice",...,"gender_probability":0.97,"nationality":[...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub info: DemographicInfo,
    pub nationality: Vec<NationalityCandidate>,
}

/// Optional listing predicates. `None` means no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub name: Option<String>,
    pub surname: Option<String>,
    /// Inclusive lower bound.
    pub age_min: Option<i32>,
    /// Inclusive upper bound.
    pub age_max: Option<i32>,
    pub gender: Option<String>,
}

impl PersonFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.age_min.is_none()
            && self.age_max.is_none()
            && self.gender.is_none()
    }

    /// Whether a record satisfies every present predicate.
    pub fn matches(&self, record: &PersonRecord) -> bool {
        let eq = |want: &Option<String>, have: &str| want.as_deref().map_or(true, |w| w == have);
        eq(&self.name, &record.identity.name)
            && eq(&self.surname, &record.identity.surname)
            && self.age_min.map_or(true, |min| record.info.age >= min)
            && self.age_max.map_or(true, |max| record.info.age <= max)
            && eq(&self.gender, &record.info.gender)
    }
}

/// 1-based page number and page size, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Result<Self, PeopleError> {
        if page == 0 {
            return Err(PeopleError::Validation("page must be at least 1".into()));
        }
        if per_page == 0 {
            return Err(PeopleError::Validation("per_page must be at least 1".into()));
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// One page of records plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonPage {
    pub people: Vec<PersonRecord>,
    pub total: i64,
    pub page: PageRequest,
}
