use crate::api::client::LookupClient;
use crate::api::models::Candidate;
use crate::error::ApiError;
use async_trait::async_trait;

/// Remote lookup collaborator: query text in, ordered candidates out.
#[async_trait]
pub trait LookupService: Send + Sync + 'static {
    /// Look up candidates for an already-trimmed, non-empty query
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, ApiError>;
}

#[async_trait]
impl LookupService for LookupClient {
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, ApiError> {
        LookupClient::lookup(self, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Mock service for testing the trait object path
    struct MockService;

    #[async_trait]
    impl LookupService for MockService {
        async fn lookup(&self, query: &str) -> Result<Vec<Candidate>, ApiError> {
            if query == "broken" {
                return Err(ApiError::Decode {
                    endpoint: "/sick".to_string(),
                    message: "not an array".to_string(),
                });
            }
            Ok(vec![Candidate::new("J45", format!("{} match", query))])
        }
    }

    #[tokio::test]
    async fn test_lookup_through_trait_object() {
        let service: Arc<dyn LookupService> = Arc::new(MockService);

        let result = service.lookup("asthma").await;
        tokio_test::assert_ok!(&result);
        assert_eq!(result.unwrap()[0].name, "asthma match");

        let result = service.lookup("broken").await;
        tokio_test::assert_err!(&result);
    }
}
