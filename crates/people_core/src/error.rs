use std::fmt;

use thiserror::Error;

use crate::types::PersonId;

/// Which third-party lookup an enrichment failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Age,
    Gender,
    Nationality,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Nationality => "nationality",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum PeopleError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("person {0} not found")]
    NotFound(PersonId),

    #[error("{lookup} lookup request failed: {message}")]
    EnrichmentRequest { lookup: LookupKind, message: String },

    #[error("failed to read {lookup} lookup response: {message}")]
    EnrichmentResponse { lookup: LookupKind, message: String },

    #[error("failed to parse {lookup} lookup response: {message}")]
    EnrichmentParse { lookup: LookupKind, message: String },

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("database error: {0}")]
    Database(String),
}

impl PeopleError {
    /// Status code the HTTP boundary reports for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::EnrichmentRequest { .. }
            | Self::EnrichmentResponse { .. }
            | Self::EnrichmentParse { .. }
            | Self::Transaction(_)
            | Self::Database(_) => 500,
        }
    }

    /// The lookup that failed, for enrichment errors.
    pub fn lookup(&self) -> Option<LookupKind> {
        match self {
            Self::EnrichmentRequest { lookup, .. }
            | Self::EnrichmentResponse { lookup, .. }
            | Self::EnrichmentParse { lookup, .. } => Some(*lookup),
            _ => None,
        }
    }
}
