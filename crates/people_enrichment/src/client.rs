//! Demographic lookup client
//!
//! One shared reqwest client for the three name-keyed lookup services.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use people_core::{DemographicLookup, LookupKind, NationalityCandidate, PeopleError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::types::{AgifyResponse, GenderizeResponse, NationalizeResponse};

pub const AGIFY_URL: &str = "https://api.agify.io";
pub const GENDERIZE_URL: &str = "https://api.genderize.io";
pub const NATIONALIZE_URL: &str = "https://api.nationalize.io";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Base URLs and credentials for the lookup services.
#[derive(Debug, Clone)]
pub struct LookupEndpoints {
    pub agify_url: String,
    pub genderize_url: String,
    pub nationalize_url: String,
    /// Sent as the `apikey` query parameter when set.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for LookupEndpoints {
    fn default() -> Self {
        Self {
            agify_url: AGIFY_URL.to_string(),
            genderize_url: GENDERIZE_URL.to_string(),
            nationalize_url: NATIONALIZE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LookupEndpoints {
    /// Point all three lookups at one base URL (`/age`, `/gender`, `/nationality`).
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            agify_url: format!("{base}/age"),
            genderize_url: format!("{base}/gender"),
            nationalize_url: format!("{base}/nationality"),
            ..Self::default()
        }
    }

    fn url_for(&self, lookup: LookupKind) -> &str {
        match lookup {
            LookupKind::Age => &self.agify_url,
            LookupKind::Gender => &self.genderize_url,
            LookupKind::Nationality => &self.nationalize_url,
        }
    }
}

pub struct NameLookupClient {
    client: Client,
    endpoints: LookupEndpoints,
}

impl NameLookupClient {
    pub fn new(endpoints: LookupEndpoints) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(endpoints.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &LookupEndpoints {
        &self.endpoints
    }

    /// GET `{base}?name=..` and decode the body.
    ///
    /// Transport failures are request errors, a non-success status or an
    /// unreadable body are response errors, and bad JSON is a parse error.
    async fn get_json<T: DeserializeOwned>(&self, lookup: LookupKind, name: &str) -> Result<T> {
        let url = self.endpoints.url_for(lookup);
        let mut request = self.client.get(url).query(&[("name", name)]);
        if let Some(key) = &self.endpoints.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PeopleError::EnrichmentRequest {
                lookup,
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PeopleError::EnrichmentResponse {
                lookup,
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(PeopleError::EnrichmentResponse {
                lookup,
                message: format!("HTTP {}: {}", status, truncate(&body, 200)),
            });
        }

        tracing::debug!(%lookup, name = %name, "lookup response received");
        decode(lookup, &body)
    }
}

fn decode<T: DeserializeOwned>(lookup: LookupKind, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PeopleError::EnrichmentParse {
        lookup,
        message: format!("{} (body: {})", e, truncate(body, 200)),
    })
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl DemographicLookup for NameLookupClient {
    async fn fetch_age(&self, name: &str) -> Result<i32> {
        let response: AgifyResponse = self.get_json(LookupKind::Age, name).await?;
        Ok(response.age.unwrap_or_default())
    }

    async fn fetch_gender(&self, name: &str) -> Result<(String, f64)> {
        let response: GenderizeResponse = self.get_json(LookupKind::Gender, name).await?;
        Ok((
            response.gender.unwrap_or_default(),
            response.probability.unwrap_or_default(),
        ))
    }

    async fn fetch_nationalities(&self, name: &str) -> Result<Vec<NationalityCandidate>> {
        let response: NationalizeResponse = self.get_json(LookupKind::Nationality, name).await?;
        Ok(response.country.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;

    /// Serve canned lookup responses on an ephemeral local port.
    async fn spawn_lookup_server() -> String {
        let app = Router::new()
            .route("/age", get(|| async { r#"{"count":10,"name":"Alice","age":30}"# }))
            .route(
                "/echo/age",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let len = q.get("name").map(|n| n.chars().count()).unwrap_or_default();
                    format!(r#"{{"count":1,"age":{len}}}"#)
                }),
            )
            .route(
                "/gender",
                get(|| async { r#"{"count":10,"name":"Alice","gender":"female","probability":0.97}"# }),
            )
            .route(
                "/nationality",
                get(|| async {
                    r#"{"count":10,"name":"Alice","country":[
                        {"country_id":"US","probability":0.6},
                        {"country_id":"GB","probability":0.3}]}"#
                }),
            )
            .route("/unknown/age", get(|| async { r#"{"count":0,"name":"Qx","age":null}"# }))
            .route("/broken/age", get(|| async { "<html>oops</html>" }))
            .route(
                "/limited/age",
                get(|| async {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        r#"{"error":"Request limit reached"}"#,
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base: &str) -> NameLookupClient {
        NameLookupClient::new(LookupEndpoints::single_host(base)).unwrap()
    }

    #[tokio::test]
    async fn fetches_all_three_lookups() {
        let base = spawn_lookup_server().await;
        let client = client_for(&base);

        assert_eq!(client.fetch_age("Alice").await.unwrap(), 30);
        assert_eq!(
            client.fetch_gender("Alice").await.unwrap(),
            ("female".to_string(), 0.97)
        );
        assert_eq!(
            client.fetch_nationalities("Alice").await.unwrap(),
            vec![
                NationalityCandidate::new("US", 0.6),
                NationalityCandidate::new("GB", 0.3),
            ]
        );
    }

    #[tokio::test]
    async fn name_is_sent_as_query_parameter() {
        let base = spawn_lookup_server().await;
        let client = client_for(&format!("{base}/echo"));

        // The echo route answers with the length of the decoded name.
        assert_eq!(client.fetch_age("Anne Marie&x=1").await.unwrap(), 14);
    }

    #[tokio::test]
    async fn unknown_name_decodes_to_zero_age() {
        let base = spawn_lookup_server().await;
        let client = client_for(&format!("{base}/unknown"));

        assert_eq!(client.fetch_age("Qx").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let base = spawn_lookup_server().await;
        let client = client_for(&format!("{base}/broken"));

        let err = client.fetch_age("Alice").await.unwrap_err();
        assert!(matches!(
            err,
            PeopleError::EnrichmentParse {
                lookup: LookupKind::Age,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn error_status_is_response_error() {
        let base = spawn_lookup_server().await;
        let client = client_for(&format!("{base}/limited"));

        let err = client.fetch_age("Alice").await.unwrap_err();
        match err {
            PeopleError::EnrichmentResponse { lookup, message } => {
                assert_eq!(lookup, LookupKind::Age);
                assert!(message.contains("429"));
            }
            other => panic!("expected response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_request_error() {
        // Bind then drop to get a local port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"));
        let err = client.fetch_nationalities("Alice").await.unwrap_err();
        assert_eq!(err.lookup(), Some(LookupKind::Nationality));
        assert!(matches!(err, PeopleError::EnrichmentRequest { .. }));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
