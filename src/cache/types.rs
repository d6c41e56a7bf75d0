use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cached state of one `(search, sort)` pair.
///
/// `total_results` is the only field the orchestrator reads. Everything else is resumption
/// state owned by the backend strategy that wrote it, kept as opaque named JSON fields so the
/// variant and gene-aggregation strategies can share one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedSearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_results: Option<u64>,

    #[serde(flatten)]
    state: Map<String, Value>,
}

impl CachedSearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    #[inline]
    pub fn set_total_results(&mut self, total: u64) {
        self.total_results = Some(total);
    }

    pub fn is_empty(&self) -> bool {
        self.total_results.is_none() && self.state.is_empty()
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.state.contains_key(name)
    }

    /// Decodes a named state field. Missing or undecodable fields read as `None`.
    pub fn state<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.state
            .get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn set_state<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), serde_json::Error> {
        self.state
            .insert(name.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}
