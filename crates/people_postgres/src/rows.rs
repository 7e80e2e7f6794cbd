//! sqlx row types for the people / info / countries tables.

use people_core::{DemographicInfo, Identity, NationalityCandidate, PersonId, PersonRecord};

#[derive(Debug, sqlx::FromRow)]
pub struct PersonRow {
    pub id: PersonId,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub age: i32,
    pub gender: String,
    pub gender_probability: f64,
}

impl PersonRow {
    pub fn into_record(self, nationality: Vec<NationalityCandidate>) -> PersonRecord {
        PersonRecord {
            id: self.id,
            identity: Identity {
                name: self.name,
                surname: self.surname,
                patronymic: self.patronymic,
            },
            info: DemographicInfo {
                age: self.age,
                gender: self.gender,
                gender_probability: self.gender_probability,
            },
            nationality,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct InfoRow {
    pub age: i32,
    pub gender: String,
    pub gender_probability: f64,
}

impl From<InfoRow> for DemographicInfo {
    fn from(row: InfoRow) -> Self {
        DemographicInfo {
            age: row.age,
            gender: row.gender,
            gender_probability: row.gender_probability,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct NationalityRow {
    pub person_id: PersonId,
    pub nationality: String,
    pub probability: f64,
}

impl From<NationalityRow> for NationalityCandidate {
    fn from(row: NationalityRow) -> Self {
        NationalityCandidate::new(row.nationality, row.probability)
    }
}
