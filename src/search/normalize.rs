use crate::ckan::types::{Package, PackageSearchResult};

use super::types::{SearchItem, SearchResponse};

pub const SOURCE: &str = "dados.gov.pt";
const DATASET_URL_BASE: &str = "https://dados.gov.pt/pt/datasets/";
const UNTITLED: &str = "Sem título";

/// Map a `package_search` result into the output schema, keeping upstream order.
pub fn normalize(query: &str, result: PackageSearchResult) -> SearchResponse {
    let results = result
        .results
        .unwrap_or_default()
        .into_iter()
        .map(to_item)
        .collect();

    SearchResponse {
        query: query.to_string(),
        count: result.count.unwrap_or(0),
        results,
    }
}

fn to_item(pkg: Package) -> SearchItem {
    let name = non_empty(pkg.name);
    let title = non_empty(pkg.title)
        .or_else(|| name.clone())
        .unwrap_or_else(|| UNTITLED.to_string());

    SearchItem {
        title,
        organization: pkg.organization.and_then(|org| org.title),
        notes: pkg.notes,
        metadata_created: pkg.metadata_created,
        url: name.map(|n| format!("{DATASET_URL_BASE}{n}")),
        source: SOURCE.to_string(),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
