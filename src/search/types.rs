use serde::Serialize;

/// One dataset in the simplified output schema. Absent fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub title: String,
    pub organization: Option<String>,
    pub notes: Option<String>,
    pub metadata_created: Option<String>,
    pub url: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Total matches reported by the catalog, not the length of `results`.
    pub count: u64,
    pub results: Vec<SearchItem>,
}
