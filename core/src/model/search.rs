use serde::{Deserialize, Serialize};

use super::content::Content;
use super::space::Space;
use super::user::User;

/// Scopes a CQL expression to a space and/or a piece of content. Sent as
/// the percent-encoded JSON `cqlcontext` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CqlContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

impl CqlContext {
    pub fn new(space_key: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            space_key: Some(space_key.into()),
            content_id: Some(content_id.into()),
        }
    }
}

/// How search results should excerpt matching text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Excerpt {
    Indexed,
    Highlight,
    None,
}

impl Excerpt {
    pub fn identifier(&self) -> &'static str {
        match self {
            Excerpt::Indexed => "indexed",
            Excerpt::Highlight => "highlight",
            Excerpt::None => "none",
        }
    }
}

/// One page of `GET rest/api/content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPage {
    pub results: Option<Vec<Content>>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub size: Option<u32>,
}

/// One page of `GET rest/api/content/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSearchResults {
    pub results: Option<Vec<Content>>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub size: Option<u32>,
    pub total_size: Option<u32>,
    pub cql_query: Option<String>,
    pub search_duration: Option<u32>,
}

/// One page of `GET rest/api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub results: Option<Vec<SearchResult>>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub size: Option<u32>,
    pub total_size: Option<u32>,
    pub cql_query: Option<String>,
    pub search_duration: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub content: Option<Content>,
    pub space: Option<Space>,
    pub user: Option<User>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub excerpt: Option<String>,
    pub result_global_container: Option<SearchResultContainer>,
    pub entity_type: Option<String>,
    pub icon_css_class: Option<String>,
    pub last_modified: Option<String>,
    pub friendly_last_modified: Option<String>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultContainer {
    pub title: Option<String>,
    pub display_url: Option<String>,
}
