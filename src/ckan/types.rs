use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Top-level body of every CKAN action API response.
#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub success: Option<bool>,
    pub result: Option<PackageSearchResult>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<ActionError>,
}

#[derive(Debug, Deserialize)]
pub struct ActionError {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(rename = "__type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
}

/// `result` of `package_search`.
#[derive(Debug, Default, Deserialize)]
pub struct PackageSearchResult {
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub results: Option<Vec<Package>>,
}

/// One dataset record. Every field is optional; a value of the wrong JSON
/// type decodes as `None`.
#[derive(Debug, Default, Deserialize)]
pub struct Package {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub metadata_created: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Keeps every element of `results`; an element that is not a record decodes
/// as an empty `Package`. A non-array `results` is treated as absent.
fn lenient_records<'de, D>(deserializer: D) -> Result<Option<Vec<Package>>, D::Error>
where
    D: Deserializer<'de>,
{
    let serde_json::Value::Array(items) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| Package::deserialize(item).unwrap_or_default())
            .collect(),
    ))
}
