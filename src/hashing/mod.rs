use blake3::Hasher;

use crate::model::SearchFilter;

/// Derives a search guid from its filter and family set.
///
/// The filter is hashed through its JSON form. `serde_json` maps keep their keys sorted, so
/// semantically equal filters always produce the same bytes. Families must already be
/// sorted and de-duplicated (see [`crate::model::SearchDefinition::new`]).
pub fn hash_search_identity(filter: &SearchFilter, families: &[String]) -> String {
    let filter_bytes =
        serde_json::to_vec(filter).unwrap_or_else(|_| format!("{:?}", filter).into_bytes());

    let mut hasher = Hasher::new();
    hasher.update(&filter_bytes);
    for family in families {
        hasher.update(b"|");
        hasher.update(family.as_bytes());
    }

    let hash = hasher.finalize();
    format!("VS{}", &hash.to_hex()[..16])
}
