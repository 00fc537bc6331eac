use crate::api::models::Candidate;
use crate::error::ApiError;
use crate::utils::error_helpers::{convert_decode_error, convert_request_error};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RESULTS: usize = 10;
const USER_AGENT: &str = concat!("sick-search/", env!("CARGO_PKG_VERSION"));
const LOOKUP_ENDPOINT: &str = "/sick";

/// How raw server results are narrowed before they reach the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOptions {
    pub max_results: usize,
    /// Keep only candidates whose name contains the query and whose code does not
    pub client_filter: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            client_filter: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupClient {
    client: Client,
    pub base_url: String,
    timeout_secs: u64,
    options: LookupOptions,
}

impl LookupClient {
    // Create client with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_options(base_url, DEFAULT_TIMEOUT_SECS, LookupOptions::default())
    }

    pub fn with_options(
        base_url: String,
        timeout_secs: u64,
        options: LookupOptions,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(LookupClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            options,
        })
    }

    pub fn options(&self) -> &LookupOptions {
        &self.options
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Fetch candidates matching `query` from `GET /sick?q=<query>`.
    ///
    /// The query is trimmed before sending. Transport failures and non-2xx
    /// statuses map to network-class errors; a 2xx body that is not a
    /// candidate array maps to [`ApiError::Decode`].
    pub async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, ApiError> {
        let query = query.trim();
        log::info!("calling lookup api: GET {}?q={}", LOOKUP_ENDPOINT, query);

        let response = self
            .build_request(Method::GET, LOOKUP_ENDPOINT)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| convert_request_error(e, LOOKUP_ENDPOINT, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| convert_request_error(e, LOOKUP_ENDPOINT, self.timeout_secs))?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                408 | 504 => ApiError::Timeout {
                    timeout_secs: self.timeout_secs,
                    endpoint: LOOKUP_ENDPOINT.to_string(),
                },
                code => ApiError::Http {
                    status: code,
                    endpoint: LOOKUP_ENDPOINT.to_string(),
                    message: if body.is_empty() {
                        "Unknown error".to_string()
                    } else {
                        body
                    },
                },
            });
        }

        let candidates: Vec<Candidate> = serde_json::from_str(&body)
            .map_err(|e| convert_decode_error(e, LOOKUP_ENDPOINT))?;

        Ok(self.narrow(query, candidates))
    }

    fn narrow(&self, query: &str, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|c| !self.options.client_filter || c.matches(query))
            .take(self.options.max_results)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LookupClient::new("http://example.test/".to_string());
        assert!(client.is_ok());
        if let Ok(client) = client {
            assert_eq!(client.base_url, "http://example.test");
            assert_eq!(client.options(), &LookupOptions::default());
        }
    }

    #[test]
    fn test_build_request() {
        let client =
            LookupClient::new("http://example.test".to_string()).expect("client creation failed");
        let request = client
            .build_request(Method::GET, "/sick")
            .query(&[("q", "asthma")]);

        let built_request = request.build().expect("Failed to build request");

        assert_eq!(
            built_request.url().as_str(),
            "http://example.test/sick?q=asthma"
        );
        assert_eq!(built_request.method(), Method::GET);
    }

    #[test]
    fn test_narrow_filters_by_name_and_truncates() {
        let client = LookupClient::with_options(
            "http://example.test".to_string(),
            5,
            LookupOptions {
                max_results: 2,
                client_filter: true,
            },
        )
        .expect("client creation failed");

        let raw = vec![
            Candidate::new("J45", "Asthma"),
            Candidate::new("ASTHMA-1", "Asthma, unspecified"),
            Candidate::new("ASTH", "Bronchitis"),
            Candidate::new("J46", "Status asthmaticus"),
            Candidate::new("J45.0", "Allergic asthma"),
        ];

        let narrowed = client.narrow("asthma", raw);
        assert_eq!(
            narrowed,
            vec![
                Candidate::new("J45", "Asthma"),
                Candidate::new("J46", "Status asthmaticus"),
            ]
        );
    }

    #[test]
    fn test_narrow_without_filter_keeps_server_order() {
        let client = LookupClient::with_options(
            "http://example.test".to_string(),
            5,
            LookupOptions {
                max_results: 10,
                client_filter: false,
            },
        )
        .expect("client creation failed");

        let raw = vec![
            Candidate::new("A01", "Typhoid"),
            Candidate::new("J45", "Asthma"),
        ];
        assert_eq!(client.narrow("asthma", raw.clone()), raw);
    }
}
