use std::time::Duration;

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::types::{Fact, NewFact, VoteColumn};
use crate::categories::CategoryFilter;

/// Hard cap on any response body. A full 1000-row list is well under this.
const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024;

/// Rows fetched per list request. The board shows at most this many facts.
const LIST_LIMIT: u32 = 1000;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Store returned HTTP {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Malformed store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Store returned no row")]
    MissingRow,
    #[error("Insecure store URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

// ============================================================================
// Client
// ============================================================================

/// Connection settings for the facts board.
#[derive(Debug)]
pub struct StoreConfig {
    /// Endpoint root, e.g. `https://abc123.supabase.co`.
    pub base_url: String,
    /// Project API key, sent as both `apikey` and `Authorization: Bearer`.
    pub api_key: Option<SecretString>,
    /// Per-request budget. A request that outlives this fails with
    /// [`StoreError::Timeout`]; there is no retry.
    pub timeout: Duration,
}

/// HTTP client for the facts table.
///
/// Speaks the PostgREST dialect: filters and ordering ride in the query
/// string, inserts take a JSON array of rows, and
/// `Prefer: return=representation` makes writes echo the resulting row
/// back. Every method issues exactly one request.
pub struct StoreClient {
    http: reqwest::Client,
    facts_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl StoreClient {
    /// Builds a client for the given endpoint.
    ///
    /// The API key travels in headers, so plain HTTP would expose it;
    /// non-HTTPS base URLs are rejected except for localhost, which the
    /// tests rely on.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let base = config.base_url.trim_end_matches('/');

        if !base.starts_with("https://") {
            let is_localhost =
                base.starts_with("http://127.0.0.1") || base.starts_with("http://localhost");
            if !is_localhost {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS store URL");
                return Err(StoreError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base, "Using non-HTTPS store URL (localhost only)");
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("til/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(StoreClient {
            http,
            facts_url: format!("{}/rest/v1/facts", base),
            api_key: config.api_key,
            timeout: config.timeout,
        })
    }

    /// Lists facts for a category selection, most interesting first.
    ///
    /// The order and limit are applied by the store, not locally, so the
    /// client sees the same slice of the board the original web page did.
    pub async fn list_facts(&self, filter: CategoryFilter) -> Result<Vec<Fact>, StoreError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        if let Some(cat) = filter.category() {
            query.push(("category", format!("eq.{}", cat.name())));
        }
        query.push(("order", "votesInteresting.desc".to_string()));
        query.push(("limit", LIST_LIMIT.to_string()));

        tracing::debug!(filter = filter.label(), "Listing facts");
        let request = self.http.get(&self.facts_url).query(&query);
        self.rows(request).await
    }

    /// Inserts a draft and returns the row the store created.
    ///
    /// The returned row, not the draft, is what the UI must display: the
    /// store assigns the id, the zeroed counters and `createdIn`.
    pub async fn insert_fact(&self, draft: &NewFact) -> Result<Fact, StoreError> {
        tracing::debug!(category = draft.category.name(), "Inserting fact");
        let request = self
            .http
            .post(&self.facts_url)
            .header("Prefer", "return=representation")
            .json(&[draft]);
        self.single_row(request).await
    }

    /// Re-reads one fact by id.
    pub async fn fetch_fact(&self, id: i64) -> Result<Fact, StoreError> {
        tracing::debug!(fact_id = id, "Fetching fact");
        let request = self
            .http
            .get(&self.facts_url)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);
        self.single_row(request).await
    }

    /// Writes new values for one or two vote counters in a single update.
    ///
    /// A vote switch changes two columns at once; sending them in one
    /// request keeps the row from ever being observed half-switched.
    pub async fn update_fact_fields(
        &self,
        id: i64,
        changes: &[(VoteColumn, i64)],
    ) -> Result<Fact, StoreError> {
        let body: serde_json::Map<String, serde_json::Value> = changes
            .iter()
            .map(|(col, value)| (col.column_name().to_string(), (*value).into()))
            .collect();

        tracing::debug!(fact_id = id, columns = changes.len(), "Updating fact");
        let request = self
            .http
            .patch(&self.facts_url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&body);
        self.single_row(request).await
    }

    /// Applies vote count deltas as one read-then-write pair: re-read the
    /// row, add each delta to the count the row holds now, and write the
    /// results back in a single update.
    ///
    /// Counts on the caller's screen may be minutes old; basing the write on
    /// a fresh read means racing clients mostly stack their votes instead of
    /// overwriting each other.
    pub async fn apply_vote_deltas(
        &self,
        fact_id: i64,
        deltas: &[(VoteColumn, i64)],
    ) -> Result<Fact, StoreError> {
        let fresh = self.fetch_fact(fact_id).await?;
        let changes: Vec<(VoteColumn, i64)> = deltas
            .iter()
            .map(|(column, delta)| (*column, fresh.votes(*column) + *delta))
            .collect();
        self.update_fact_fields(fact_id, &changes).await
    }

    /// Sends a request and parses the JSON array of rows every PostgREST
    /// endpoint replies with.
    async fn rows(&self, request: reqwest::RequestBuilder) -> Result<Vec<Fact>, StoreError> {
        let mut request = request.header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key.expose_secret())
                .header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
            .map_err(StoreError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Store request failed");
            return Err(StoreError::HttpStatus(status.as_u16()));
        }

        let body = read_limited_text(response, MAX_RESPONSE_SIZE).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`Self::rows`] but expects exactly the affected row back.
    async fn single_row(&self, request: reqwest::RequestBuilder) -> Result<Fact, StoreError> {
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::MissingRow)
    }
}

/// Reads a response body with a byte cap, streaming so an oversized reply
/// is abandoned at the cap rather than buffered whole.
async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, StoreError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(StoreError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(StoreError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(StoreError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| StoreError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row(id: i64, interesting: i64) -> serde_json::Value {
        json!({
            "id": id,
            "text": "Rust's mascot is a crab named Ferris",
            "source": "https://example.com/ferris",
            "category": "technology",
            "votesInteresting": interesting,
            "votesMindblow": 0,
            "votesFalse": 0,
            "createdIn": 2020
        })
    }

    async fn client_for(server: &MockServer) -> StoreClient {
        StoreClient::new(StoreConfig {
            base_url: server.uri(),
            api_key: Some(SecretString::from("test-key")),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_all_orders_and_limits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/facts"))
            .and(query_param("select", "*"))
            .and(query_param("order", "votesInteresting.desc"))
            .and(query_param("limit", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, 5), row(2, 3)])))
            .expect(1)
            .mount(&server)
            .await;

        let facts = client_for(&server)
            .await
            .list_facts(CategoryFilter::All)
            .await
            .unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].id, 1);
    }

    #[tokio::test]
    async fn test_list_category_adds_eq_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/facts"))
            .and(query_param("category", "eq.society"))
            .and(query_param("order", "votesInteresting.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let facts = client_for(&server)
            .await
            .list_facts(CategoryFilter::Only(Category::Society))
            .await
            .unwrap();
        assert!(facts.is_empty());
    }

    #[tokio::test]
    async fn test_api_key_sent_in_both_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("apikey", "test-key"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .await
            .list_facts(CategoryFilter::All)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_posts_single_element_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/facts"))
            .and(header("Prefer", "return=representation"))
            .and(body_json(json!([{
                "text": "Bananas are berries",
                "source": "https://example.com/bananas",
                "category": "science"
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(9, 0)])))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .await
            .insert_fact(&NewFact {
                text: "Bananas are berries".to_string(),
                source: "https://example.com/bananas".to_string(),
                category: Category::Science,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_insert_with_empty_representation_is_missing_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .await
            .insert_fact(&NewFact {
                text: "x".to_string(),
                source: "https://example.com".to_string(),
                category: Category::News,
            })
            .await;
        assert!(matches!(result, Err(StoreError::MissingRow)));
    }

    #[tokio::test]
    async fn test_fetch_fact_filters_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/facts"))
            .and(query_param("id", "eq.42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(42, 7)])))
            .expect(1)
            .mount(&server)
            .await;

        let fact = client_for(&server).await.fetch_fact(42).await.unwrap();
        assert_eq!(fact.id, 42);
        assert_eq!(fact.votes_interesting, 7);
    }

    #[tokio::test]
    async fn test_update_patches_given_columns_only() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/facts"))
            .and(query_param("id", "eq.42"))
            .and(header("Prefer", "return=representation"))
            .and(body_json(json!({
                "votesInteresting": 8,
                "votesFalse": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(42, 8)])))
            .expect(1)
            .mount(&server)
            .await;

        let fact = client_for(&server)
            .await
            .update_fact_fields(
                42,
                &[(VoteColumn::Interesting, 8), (VoteColumn::False, 2)],
            )
            .await
            .unwrap();
        assert_eq!(fact.votes_interesting, 8);
    }

    #[tokio::test]
    async fn test_http_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).await.list_facts(CategoryFilter::All).await;
        assert!(matches!(result, Err(StoreError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.list_facts(CategoryFilter::All).await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = StoreClient::new(StoreConfig {
            base_url: server.uri(),
            api_key: None,
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        let result = client.list_facts(CategoryFilter::All).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(vec![b' '; MAX_RESPONSE_SIZE + 1]),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).await.list_facts(CategoryFilter::All).await;
        assert!(matches!(result, Err(StoreError::ResponseTooLarge(_))));
    }

    #[tokio::test]
    async fn test_non_https_base_url_rejected() {
        let result = StoreClient::new(StoreConfig {
            base_url: "http://board.example.com".to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        });
        assert!(matches!(result, Err(StoreError::InsecureBaseUrl)));
    }

    #[tokio::test]
    async fn test_localhost_base_url_allowed() {
        // MockServer binds 127.0.0.1, which the HTTPS check exempts.
        let server = MockServer::start().await;
        assert!(StoreClient::new(StoreConfig {
            base_url: server.uri(),
            api_key: None,
            timeout: Duration::from_secs(5),
        })
        .is_ok());
    }
}
