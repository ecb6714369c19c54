use crate::error::BuildError;
use crate::expand::ContentExpansion;
use crate::http::HttpMethod;
use crate::model::{ContentSearchResults, CqlContext, Excerpt, SearchResults};
use crate::query::{QueryEncoder, QueryParams};

use super::get::validate_paging;
use super::{non_empty, Operation, Request};

const SEARCH_PATH: &str = "rest/api/search";
const CONTENT_SEARCH_PATH: &str = "rest/api/content/search";

/// Builder for CQL searches.
///
/// [`Search::build`] targets the generic `rest/api/search` endpoint (users,
/// spaces and content); [`Search::build_content`] targets
/// `rest/api/content/search`, which only returns content. Both require a
/// non-empty CQL expression.
#[derive(Debug, Clone, Default)]
pub struct Search {
    cql: Option<String>,
    cql_context: Option<CqlContext>,
    excerpt: Option<Excerpt>,
    include_archived_spaces: Option<bool>,
    limit: Option<i32>,
    start: Option<i32>,
    expand: Option<ContentExpansion>,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cql(mut self, cql: impl Into<String>) -> Self {
        self.cql = Some(cql.into());
        self
    }

    pub fn cql_context(mut self, context: CqlContext) -> Self {
        self.cql_context = Some(context);
        self
    }

    pub fn excerpt(mut self, excerpt: Excerpt) -> Self {
        self.excerpt = Some(excerpt);
        self
    }

    pub fn include_archived_spaces(mut self, include: bool) -> Self {
        self.include_archived_spaces = Some(include);
        self
    }

    /// Page size. Must be positive.
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Index of the first result. Must be positive.
    pub fn start(mut self, start: i32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn expand(mut self, expansion: ContentExpansion) -> Self {
        self.expand = Some(expansion);
        self
    }

    pub fn build(self) -> Result<Request<SearchResults>, BuildError> {
        let query = self.query()?;
        Ok(Request::with_parts(
            Operation::Search,
            HttpMethod::Get,
            SEARCH_PATH.to_string(),
            query,
            None,
        ))
    }

    pub fn build_content(self) -> Result<Request<ContentSearchResults>, BuildError> {
        let query = self.query()?;
        Ok(Request::with_parts(
            Operation::SearchContent,
            HttpMethod::Get,
            CONTENT_SEARCH_PATH.to_string(),
            query,
            None,
        ))
    }

    fn query(self) -> Result<QueryParams, BuildError> {
        let cql = non_empty(&self.cql).ok_or(BuildError::MissingCql)?.to_string();
        validate_paging(self.limit, self.start)?;

        Ok(QueryEncoder::new()
            .param("cql", Some(cql))
            .cql_context(self.cql_context.as_ref())?
            .param("excerpt", self.excerpt.map(|e| e.identifier()))
            .param("includeArchivedSpaces", self.include_archived_spaces)
            .param("limit", self.limit)
            .param("start", self.start)
            .expand(self.expand.as_ref())
            .finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CQL: &str = "text~'my search phrase'";

    #[test]
    fn cql_only() {
        let request = Search::new().cql(CQL).build().unwrap();
        assert_eq!(request.method(), HttpMethod::Get);
        assert_eq!(request.relative_path(), "rest/api/search");
        assert_eq!(request.operation(), Operation::Search);
        assert!(request.body().is_none());
        let params = request.query_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params.joined("cql").as_deref(), Some(CQL));
    }

    #[test]
    fn content_search_uses_content_endpoint() {
        let request = Search::new().cql(CQL).build_content().unwrap();
        assert_eq!(request.relative_path(), "rest/api/content/search");
        assert_eq!(request.operation(), Operation::SearchContent);
        assert_eq!(request.query_params().joined("cql").as_deref(), Some(CQL));
    }

    #[test]
    fn missing_or_empty_cql_is_rejected() {
        assert_eq!(Search::new().build().unwrap_err(), BuildError::MissingCql);
        assert_eq!(Search::new().cql("").build_content().unwrap_err(), BuildError::MissingCql);
        assert_eq!(
            Search::new().limit(10).build().unwrap_err().to_string(),
            "You must specify a CQL query"
        );
    }

    #[test]
    fn paging_must_be_positive() {
        assert_eq!(
            Search::new().cql(CQL).limit(0).build().unwrap_err(),
            BuildError::NonPositiveLimit
        );
        assert_eq!(
            Search::new().cql(CQL).start(-1).build_content().unwrap_err(),
            BuildError::NonPositiveStart
        );
        let request = Search::new().cql(CQL).limit(1).start(1).build().unwrap();
        assert_eq!(request.query_params().joined("limit").as_deref(), Some("1"));
        assert_eq!(request.query_params().joined("start").as_deref(), Some("1"));
    }

    #[test]
    fn cql_context_is_sent_as_encoded_json() {
        let request = Search::new()
            .cql(CQL)
            .cql_context(CqlContext::new("spaceKey", "contentId"))
            .build()
            .unwrap();
        assert_eq!(
            request.query_params().joined("cqlcontext").as_deref(),
            Some(r#"{"spaceKey":"spaceKey","contentId":"contentId"}"#)
        );
        assert_eq!(
            request.query_params().to_query_string(),
            "cql=text~%27my%20search%20phrase%27\
             &cqlcontext=%7B%22spaceKey%22%3A%22spaceKey%22%2C%22contentId%22%3A%22contentId%22%7D"
        );
    }

    #[test]
    fn excerpt_and_archived_spaces() {
        let request = Search::new()
            .cql(CQL)
            .excerpt(Excerpt::Highlight)
            .include_archived_spaces(true)
            .build()
            .unwrap();
        let params = request.query_params();
        assert_eq!(params.len(), 3);
        assert_eq!(params.joined("excerpt").as_deref(), Some("highlight"));
        assert_eq!(params.joined("includeArchivedSpaces").as_deref(), Some("true"));
    }

    #[test]
    fn expansion_is_forwarded() {
        let request = Search::new()
            .cql(CQL)
            .expand(ContentExpansion::builder().space().build())
            .build_content()
            .unwrap();
        assert_eq!(request.query_params().joined("expand").as_deref(), Some("space"));
    }
}
