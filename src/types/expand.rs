//! Related-field expansion for list and detail endpoints.
//!
//! The `expand` query parameter names related entities to inline. Fields
//! that are not expanded serialize as bare UUID references.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;

/// Raw `expand` query parameter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpandQuery {
    /// Comma-separated related fields to inline (e.g. `author,reviews`)
    pub expand: Option<String>,
}

/// Parsed expansion request, restricted to the endpoint's permitted fields
#[derive(Debug, Clone, Default)]
pub struct Expand {
    fields: Vec<String>,
}

impl Expand {
    /// Parse the raw query, keeping only permitted fields. Unknown fields
    /// are ignored rather than rejected.
    pub fn parse(query: &ExpandQuery, permitted: &[&str]) -> Self {
        let fields = query
            .expand
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|field| permitted.contains(field))
            .map(str::to_string)
            .collect();

        Self { fields }
    }

    /// Build an expansion request directly from field names (used by tests).
    pub fn from_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// An expansion request with nothing expanded.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check whether the given field should be expanded.
    pub fn wants(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A related entity that serializes either as its UUID or, when expanded,
/// as the full nested representation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Expandable<T: Serialize> {
    Reference(Uuid),
    Expanded(T),
}

impl<T: Serialize> Expandable<T> {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Expandable::Expanded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Nested {
        name: &'static str,
    }

    #[test]
    fn parse_keeps_only_permitted_fields() {
        let query = ExpandQuery {
            expand: Some("author, reviews,bogus".into()),
        };
        let expand = Expand::parse(&query, &["author", "reviews"]);

        assert!(expand.wants("author"));
        assert!(expand.wants("reviews"));
        assert!(!expand.wants("bogus"));
    }

    #[test]
    fn missing_parameter_expands_nothing() {
        let expand = Expand::parse(&ExpandQuery::default(), &["author"]);
        assert!(expand.is_empty());
        assert!(!expand.wants("author"));
    }

    #[test]
    fn reference_serializes_as_bare_uuid() {
        let id = Uuid::new_v4();
        let value: Expandable<Nested> = Expandable::Reference(id);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!(id.to_string()));
    }

    #[test]
    fn expanded_serializes_as_object() {
        let value = Expandable::Expanded(Nested { name: "inner" });
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "inner" }));
    }
}
