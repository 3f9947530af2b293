use serde::Deserialize;

/// Query string of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search term, e.g. "Portal BASE contratos públicos"
    pub q: String,
    /// Page size forwarded to the catalog (default: 10)
    pub rows: Option<i64>,
    /// Offset forwarded to the catalog (default: 0)
    pub start: Option<i64>,
}
