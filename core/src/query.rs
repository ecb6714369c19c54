//! Query parameter maps and their wire encoding.
//!
//! # Design
//! Builders declare optional query options; [`QueryEncoder`] turns only the
//! options that were actually set into a [`QueryParams`] map. Keys map to
//! sets of values so repeated selectors (expansion paths) collapse and are
//! sent as one comma-joined value. Both levels are ordered, which makes the
//! produced query string deterministic.

use std::collections::{BTreeMap, BTreeSet};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::BuildError;
use crate::expand::ContentExpansion;
use crate::model::CqlContext;

/// Characters left untouched in query keys and values (RFC 3986 unreserved).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// String-keyed, multi-valued query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, BTreeSet<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `key`. Duplicate values collapse.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().insert(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.0.get(key)
    }

    /// The flattened, comma-joined value for `key`.
    pub fn joined(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|values| join(values))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(key, values)| (key.as_str(), values))
    }

    /// One `(key, value)` pair per key, multi-valued keys comma-joined.
    pub fn flatten(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, values)| (key.clone(), join(values)))
            .collect()
    }

    /// The encoded `key=value&...` string, without a leading `?`.
    ///
    /// Values are stored raw and encoded exactly once here; a literal `%` in
    /// a value always goes out as `%25`.
    pub fn to_query_string(&self) -> String {
        self.flatten()
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

/// Serialize a search context to compact JSON. The JSON is stored raw as the
/// `cqlcontext` value and percent-encoded once with the rest of the query,
/// which turns it into a single opaque parameter on the wire.
pub(crate) fn cql_context_json(context: &CqlContext) -> Result<String, BuildError> {
    serde_json::to_string(context).map_err(|e| BuildError::CqlContext(e.to_string()))
}

/// Collects the query options a request declares, skipping unset ones.
#[derive(Debug, Default)]
pub(crate) struct QueryEncoder {
    params: QueryParams,
}

impl QueryEncoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn param(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.params.insert(key, value.to_string());
        }
        self
    }

    pub(crate) fn expand(mut self, expansion: Option<&ContentExpansion>) -> Self {
        for path in expansion.into_iter().flat_map(|expansion| expansion.paths()) {
            self.params.insert("expand", path);
        }
        self
    }

    pub(crate) fn cql_context(mut self, context: Option<&CqlContext>) -> Result<Self, BuildError> {
        if let Some(context) = context {
            self.params.insert("cqlcontext", cql_context_json(context)?);
        }
        Ok(self)
    }

    pub(crate) fn finish(self) -> QueryParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::{ContentExpansion, HistoryProperties};

    #[test]
    fn unset_options_contribute_nothing() {
        let params = QueryEncoder::new()
            .param("limit", None::<i32>)
            .param("title", None::<&str>)
            .expand(None)
            .cql_context(None)
            .unwrap()
            .finish();
        assert!(params.is_empty());
    }

    #[test]
    fn set_options_are_stringified() {
        let params = QueryEncoder::new()
            .param("limit", Some(25))
            .param("includeArchivedSpaces", Some(true))
            .finish();
        assert_eq!(params.joined("limit").as_deref(), Some("25"));
        assert_eq!(params.joined("includeArchivedSpaces").as_deref(), Some("true"));
    }

    #[test]
    fn expansion_paths_share_one_key() {
        let expansion = ContentExpansion::builder()
            .version()
            .history(&HistoryProperties::builder().last_updated().build())
            .build();
        let params = QueryEncoder::new().expand(Some(&expansion)).finish();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("expand").unwrap().len(), 2);
        assert_eq!(
            params.joined("expand").as_deref(),
            Some("history.lastUpdated,version")
        );
    }

    #[test]
    fn empty_expansion_adds_no_key() {
        let expansion = ContentExpansion::builder().build();
        let params = QueryEncoder::new().expand(Some(&expansion)).finish();
        assert!(!params.contains_key("expand"));
    }

    #[test]
    fn cql_context_is_compact_json() {
        let json = cql_context_json(&CqlContext::new("spaceKey", "contentId")).unwrap();
        assert_eq!(json, r#"{"spaceKey":"spaceKey","contentId":"contentId"}"#);
    }

    #[test]
    fn cql_context_is_encoded_once_on_the_wire() {
        let context = CqlContext {
            space_key: Some("MY SPACE".to_string()),
            content_id: None,
        };
        let params = QueryEncoder::new()
            .cql_context(Some(&context))
            .unwrap()
            .finish();
        assert_eq!(
            params.to_query_string(),
            "cqlcontext=%7B%22spaceKey%22%3A%22MY%20SPACE%22%7D"
        );
    }

    #[test]
    fn query_string_is_sorted_and_encoded() {
        let mut params = QueryParams::new();
        params.insert("title", "Q&A notes");
        params.insert("spaceKey", "DOC");
        params.insert("expand", "version");
        params.insert("expand", "body.storage.value");
        assert_eq!(
            params.to_query_string(),
            "expand=body.storage.value%2Cversion&spaceKey=DOC&title=Q%26A%20notes"
        );
    }

    #[test]
    fn literal_percent_sequences_are_always_escaped() {
        let mut params = QueryParams::new();
        params.insert("title", "Sale 50%25 off");
        params.insert("cql", r#"title ~ "%41""#);
        assert_eq!(
            params.to_query_string(),
            "cql=title%20~%20%22%2541%22&title=Sale%2050%2525%20off"
        );
    }

    #[test]
    fn stray_percent_signs_are_encoded() {
        assert_eq!(encode_component("100%"), "100%25");
        assert_eq!(encode_component("%4"), "%254");
        assert_eq!(encode_component("a%20b"), "a%2520b");
    }

    #[test]
    fn cql_is_encoded_as_a_single_component() {
        assert_eq!(
            encode_component("text~'my search phrase'"),
            "text~%27my%20search%20phrase%27"
        );
    }

    #[test]
    fn multi_byte_values_are_utf8_encoded() {
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }
}
