//! Request and response bodies for the people API.

use people_core::{Identity, PageRequest, PersonFilter, PersonPage, PersonRecord};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::AppError;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 10;

/// Body of `POST /api/people` and `PUT /api/people/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonBody {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
}

impl From<PersonBody> for Identity {
    fn from(body: PersonBody) -> Self {
        Identity::new(body.name, body.surname, body.patronymic)
    }
}

/// Query string of `GET /api/people`. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age_min: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age_max: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn filter(&self) -> PersonFilter {
        PersonFilter {
            name: non_empty(&self.name),
            surname: non_empty(&self.surname),
            age_min: positive(self.age_min),
            age_max: positive(self.age_max),
            gender: non_empty(&self.gender),
        }
    }

    /// Missing or non-positive values fall back to page 1 of 10.
    pub fn page_request(&self) -> Result<PageRequest, AppError> {
        let page = positive_or(self.page, DEFAULT_PAGE)?;
        let per_page = positive_or(self.per_page, DEFAULT_PER_PAGE)?;
        Ok(PageRequest::new(page, per_page)?)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

/// Age bounds of zero or below place no constraint.
fn positive(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v > 0)
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{v}'"))),
    }
}

fn positive_or(value: Option<i64>, default: u32) -> Result<u32, AppError> {
    match value {
        Some(v) if v > 0 => u32::try_from(v)
            .map_err(|_| AppError::BadRequest(format!("page value {v} is too large"))),
        _ => Ok(default),
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub current_page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse {
    pub data: Vec<PersonRecord>,
    pub pagination: Pagination,
}

impl From<PersonPage> for PaginatedResponse {
    fn from(page: PersonPage) -> Self {
        Self {
            pagination: Pagination {
                total: page.total,
                current_page: page.page.page(),
                per_page: page.page.per_page(),
            },
            data: page.people,
        }
    }
}
