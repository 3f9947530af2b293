pub mod types;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use types::{ActionError, ActionResponse, PackageSearchResult};

pub const DEFAULT_BASE_URL: &str = "https://dados.gov.pt/api/3/action";
pub const SORT_ORDER: &str = "score desc, metadata_modified desc";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum CkanError {
    #[error("catalog request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("catalog returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("invalid catalog response: {0}")]
    Decode(String),

    #[error("catalog rejected the query: {0}")]
    Rejected(String),
}

impl CkanError {
    /// True when the exchange itself failed, false when the catalog answered
    /// and reported `success: false`.
    pub fn is_transport(&self) -> bool {
        !matches!(self, CkanError::Rejected(_))
    }
}

/// Parameters forwarded to `package_search`.
#[derive(Debug, Clone, Copy)]
pub struct PackageQuery<'a> {
    pub q: &'a str,
    pub rows: i64,
    pub start: i64,
}

/// Abstraction over the catalog's package search.
/// Implemented by `CkanClient` for production; mock implementations used in tests.
pub trait PackageSearch {
    async fn package_search(
        &self,
        query: PackageQuery<'_>,
    ) -> Result<PackageSearchResult, CkanError>;
}

#[derive(Clone)]
pub struct CkanClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl CkanClient {
    /// `base_url` is the action API root, e.g. `https://dados.gov.pt/api/3/action`.
    pub fn new(http: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(&format!(
            "{}/package_search",
            base_url.trim_end_matches('/')
        ))?;
        Ok(Self {
            http,
            endpoint,
            timeout: REQUEST_TIMEOUT,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn package_search_url(&self, query: PackageQuery<'_>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query.q)
            .append_pair("rows", &query.rows.to_string())
            .append_pair("start", &query.start.to_string())
            .append_pair("sort", SORT_ORDER);
        url
    }

    fn transport_error(&self, e: reqwest::Error) -> CkanError {
        if e.is_timeout() {
            CkanError::Timeout(self.timeout.as_secs())
        } else {
            CkanError::Network(e)
        }
    }
}

impl PackageSearch for CkanClient {
    async fn package_search(
        &self,
        query: PackageQuery<'_>,
    ) -> Result<PackageSearchResult, CkanError> {
        let url = self.package_search_url(query);

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = %status, "catalog returned non-success status");
            return Err(CkanError::Status {
                code: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let body: ActionResponse =
            serde_json::from_str(&text).map_err(|e| CkanError::Decode(e.to_string()))?;

        if body.success != Some(true) {
            let message = rejection_message(body.error.as_ref());
            warn!(error = %message, "catalog reported failure");
            return Err(CkanError::Rejected(message));
        }

        let result = body
            .result
            .ok_or_else(|| CkanError::Decode("response has no `result` object".to_string()))?;

        debug!(
            count = ?result.count,
            returned = result.results.as_ref().map_or(0, Vec::len),
            "package_search complete"
        );
        Ok(result)
    }
}

fn rejection_message(error: Option<&ActionError>) -> String {
    match error {
        Some(ActionError {
            message: Some(message),
            kind,
        }) => match kind {
            Some(kind) => format!("{kind}: {message}"),
            None => message.clone(),
        },
        _ => "response did not report success".to_string(),
    }
}

/// Prefer CKAN's `error.message`; fall back to a snippet of the raw body.
fn extract_error_message(text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ActionResponse>(text)
        && let Some(message) = body.error.and_then(|e| e.message)
    {
        return message;
    }
    let snippet: String = text.chars().take(200).collect();
    if snippet.is_empty() {
        "(empty body)".to_string()
    } else {
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str) -> PackageQuery<'_> {
        PackageQuery { q, rows: 10, start: 0 }
    }

    #[test]
    fn url_encodes_parameters_in_order() {
        let client = CkanClient::new(Client::new(), DEFAULT_BASE_URL).unwrap();
        let url = client.package_search_url(query("Portal BASE contratos"));
        assert_eq!(
            url.as_str(),
            "https://dados.gov.pt/api/3/action/package_search\
             ?q=Portal+BASE+contratos&rows=10&start=0\
             &sort=score+desc%2C+metadata_modified+desc"
        );
    }

    #[test]
    fn url_escapes_reserved_characters_in_term() {
        let client = CkanClient::new(Client::new(), DEFAULT_BASE_URL).unwrap();
        let url = client.package_search_url(query("a&b=c"));
        assert!(url.as_str().contains("q=a%26b%3Dc&"), "got: {url}");
    }

    #[test]
    fn negative_rows_pass_through() {
        let client = CkanClient::new(Client::new(), DEFAULT_BASE_URL).unwrap();
        let url = client.package_search_url(PackageQuery {
            q: "x",
            rows: -5,
            start: -1,
        });
        assert!(url.as_str().contains("rows=-5&start=-1"), "got: {url}");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let client = CkanClient::new(Client::new(), "http://localhost:5000/api/3/action/").unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "http://localhost:5000/api/3/action/package_search"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(CkanClient::new(Client::new(), "not a url").is_err());
    }

    #[test]
    fn rejected_is_not_transport() {
        assert!(!CkanError::Rejected("x".into()).is_transport());
        assert!(CkanError::Timeout(20).is_transport());
        assert!(
            CkanError::Status {
                code: 500,
                message: String::new()
            }
            .is_transport()
        );
        assert!(CkanError::Decode("x".into()).is_transport());
    }

    #[test]
    fn rejection_message_uses_ckan_error() {
        let err = ActionError {
            message: Some("Invalid search query".into()),
            kind: Some("Search Query Error".into()),
        };
        assert_eq!(
            rejection_message(Some(&err)),
            "Search Query Error: Invalid search query"
        );
        assert_eq!(rejection_message(None), "response did not report success");
    }

    #[test]
    fn error_message_falls_back_to_snippet() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(extract_error_message(""), "(empty body)");
        assert_eq!(extract_error_message(&"x".repeat(500)).len(), 200);
        assert_eq!(
            extract_error_message(r#"{"success": false, "error": {"message": "Not found"}}"#),
            "Not found"
        );
    }
}
