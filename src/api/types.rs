use std::collections::BTreeMap;

use serde_json::Value;

use super::error::ApiError;
use super::resource::Resource;

/// Extra payload fields carried next to the primary data (counts, related entities).
pub type Metadata = BTreeMap<String, Value>;

/// Parameters of one list request, serialized in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub keyword: String,
    pub result_per_page: u32,
    pub current_page: u32,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// `keyword`, `resultPerPage`, `currentPage`, then filters by key.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("keyword".to_string(), self.keyword.clone()),
            ("resultPerPage".to_string(), self.result_per_page.to_string()),
            ("currentPage".to_string(), self.current_page.to_string()),
        ];
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    pub items: Vec<Value>,
    /// Count of all entities regardless of search/filter.
    pub total_count: u64,
    /// Count of entities matching the current search/filter.
    pub filtered_count: u64,
}

impl ListPage {
    /// Read a list envelope. Missing counts fall back to what we can see.
    pub fn from_envelope(resource: Resource, body: &Value) -> Result<Self, ApiError> {
        let items = match body.get(resource.items_key()) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(ApiError::Decode {
                    message: format!("'{}' is not an array", resource.items_key()),
                })
            }
        };

        let total_count = read_count(body, resource.count_key()).unwrap_or(items.len() as u64);
        let filtered_count =
            read_count(body, resource.filtered_count_key()).unwrap_or(total_count);

        Ok(Self {
            items,
            total_count,
            filtered_count,
        })
    }
}

fn read_count(body: &Value, key: &str) -> Option<u64> {
    match body.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Result of a get-by-id call: the entity plus any sibling fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPayload {
    pub entity: Value,
    pub extra: Metadata,
}

impl EntityPayload {
    pub fn from_envelope(resource: Resource, body: Value) -> Result<Self, ApiError> {
        Self::from_keyed(resource.entity_key(), body)
    }

    pub fn from_keyed(key: &str, body: Value) -> Result<Self, ApiError> {
        let Value::Object(mut map) = body else {
            return Err(ApiError::Decode {
                message: "response body is not an object".to_string(),
            });
        };
        let entity = match map.remove(key) {
            Some(entity) if entity.is_object() => entity,
            _ => {
                return Err(ApiError::Decode {
                    message: format!("response has no '{}' object", key),
                })
            }
        };
        Ok(Self {
            entity,
            extra: map.into_iter().collect(),
        })
    }
}

/// Dashboard statistics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsRange {
    #[default]
    All,
    Daily,
    Weekly,
    Monthly,
}

impl StatsRange {
    pub fn all() -> &'static [StatsRange] {
        &[
            StatsRange::All,
            StatsRange::Daily,
            StatsRange::Weekly,
            StatsRange::Monthly,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::All => "all",
            StatsRange::Daily => "daily",
            StatsRange::Weekly => "weekly",
            StatsRange::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatsRange::All => "All Time Statistics",
            StatsRange::Daily => "Daily Statistics",
            StatsRange::Weekly => "Weekly Statistics",
            StatsRange::Monthly => "Monthly Statistics",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.as_str() == s)
    }

    pub fn next(&self) -> Self {
        match self {
            StatsRange::All => StatsRange::Daily,
            StatsRange::Daily => StatsRange::Weekly,
            StatsRange::Weekly => StatsRange::Monthly,
            StatsRange::Monthly => StatsRange::All,
        }
    }
}

/// Server-assigned identifier of an entity.
pub fn entity_id(entity: &Value) -> Option<&str> {
    entity.get("_id").and_then(Value::as_str)
}

/// Look up a dotted path such as `seller.name`.
pub fn lookup<'a>(entity: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(entity, |value, key| value.get(key))
}

/// Render a field for display, `"N/A"` when absent or empty.
pub fn display_value(entity: &Value, path: &str) -> String {
    match lookup(entity, path) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::Array(items)) => format!("{} item(s)", items.len()),
        Some(other) => other.to_string(),
    }
}

/// `2024-01-02T10:20:30.000Z` becomes `2024-01-02 10:20:30`.
pub fn format_timestamp(raw: &str) -> String {
    let without_fraction = raw.split('.').next().unwrap_or(raw);
    let without_zone = without_fraction.trim_end_matches('Z');
    match without_zone.split_once('T') {
        Some((date, time)) => format!("{} {}", date, time),
        None => without_zone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_are_ordered() {
        let mut filters = BTreeMap::new();
        filters.insert("status".to_string(), "all".to_string());
        let query = ListQuery {
            keyword: String::new(),
            result_per_page: 10,
            current_page: 1,
            filters,
        };
        let keys: Vec<String> = query.to_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["keyword", "resultPerPage", "currentPage", "status"]);
    }

    #[test]
    fn list_envelope_reads_resource_keys() {
        let body = json!({
            "transactions": [{"_id": "t1"}, {"_id": "t2"}],
            "transactionCount": 40,
            "filteredTransactionsCount": 23
        });
        let page = ListPage::from_envelope(Resource::Transaction, &body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 40);
        assert_eq!(page.filtered_count, 23);
    }

    #[test]
    fn list_envelope_tolerates_missing_counts() {
        let body = json!({ "cars": [{"_id": "c1"}] });
        let page = ListPage::from_envelope(Resource::Vehicle, &body).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.filtered_count, 1);
    }

    #[test]
    fn list_envelope_rejects_non_array() {
        let body = json!({ "cars": "oops" });
        assert!(ListPage::from_envelope(Resource::Vehicle, &body).is_err());
    }

    #[test]
    fn entity_envelope_splits_extras() {
        let body = json!({
            "auction": {"_id": "a1"},
            "bids": [{"_id": "b1"}],
            "winner": null
        });
        let payload = EntityPayload::from_envelope(Resource::Auction, body).unwrap();
        assert_eq!(entity_id(&payload.entity), Some("a1"));
        assert!(payload.extra.contains_key("bids"));
        assert!(payload.extra.contains_key("winner"));
    }

    #[test]
    fn entity_envelope_requires_entity() {
        let err = EntityPayload::from_envelope(Resource::User, json!({"car": {}})).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn display_value_falls_back() {
        let entity = json!({"color": "", "seller": {"name": "Bo"}, "owner": false});
        assert_eq!(display_value(&entity, "color"), "N/A");
        assert_eq!(display_value(&entity, "missing"), "N/A");
        assert_eq!(display_value(&entity, "seller.name"), "Bo");
        assert_eq!(display_value(&entity, "owner"), "No");
    }

    #[test]
    fn timestamps_are_trimmed() {
        assert_eq!(
            format_timestamp("2024-01-02T10:20:30.000Z"),
            "2024-01-02 10:20:30"
        );
        assert_eq!(format_timestamp("2024-01-02"), "2024-01-02");
    }
}
