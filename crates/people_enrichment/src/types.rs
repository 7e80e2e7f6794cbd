//! Lookup service response payloads.
//!
//! Unknown names come back with `null` age / gender; those decode to the
//! zero value rather than failing.

use people_core::NationalityCandidate;
use serde::Deserialize;

/// `GET https://api.agify.io/?name=...`
#[derive(Debug, Clone, Deserialize)]
pub struct AgifyResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    pub age: Option<i32>,
}

/// `GET https://api.genderize.io/?name=...`
#[derive(Debug, Clone, Deserialize)]
pub struct GenderizeResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    pub gender: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
}

/// `GET https://api.nationalize.io/?name=...`
#[derive(Debug, Clone, Deserialize)]
pub struct NationalizeResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub country: Vec<CountryGuess>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryGuess {
    pub country_id: String,
    pub probability: f64,
}

impl From<CountryGuess> for NationalityCandidate {
    fn from(guess: CountryGuess) -> Self {
        NationalityCandidate::new(guess.country_id, guess.probability)
    }
}
