use chrono::NaiveDate;

use crate::error::BuildError;
use crate::expand::ContentExpansion;
use crate::http::HttpMethod;
use crate::model::{ContentPage, ContentStatus, SortDirection};
use crate::query::QueryEncoder;

use super::{Operation, Request, CONTENT_PATH};

/// Builder for `GET rest/api/content`. Every option is a filter or paging
/// hint; none is mandatory.
#[derive(Debug, Clone, Default)]
pub struct GetContent {
    limit: Option<i32>,
    order_by: Option<(String, SortDirection)>,
    posting_day: Option<NaiveDate>,
    space_key: Option<String>,
    start: Option<i32>,
    status: Option<ContentStatus>,
    title: Option<String>,
    trigger: Option<String>,
    content_type: Option<String>,
    expand: Option<ContentExpansion>,
}

impl GetContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page size. Must be positive.
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Blog posts published on this day.
    pub fn posting_day(mut self, day: NaiveDate) -> Self {
        self.posting_day = Some(day);
        self
    }

    pub fn space_key(mut self, key: impl Into<String>) -> Self {
        self.space_key = Some(key.into());
        self
    }

    /// Index of the first result. Must be positive.
    pub fn start(mut self, start: i32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// e.g. `viewed`.
    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn expand(mut self, expansion: ContentExpansion) -> Self {
        self.expand = Some(expansion);
        self
    }

    pub fn build(self) -> Result<Request<ContentPage>, BuildError> {
        validate_paging(self.limit, self.start)?;

        let query = QueryEncoder::new()
            .param("limit", self.limit)
            .param(
                "orderBy",
                self.order_by
                    .map(|(field, direction)| format!("{field} {}", direction.identifier())),
            )
            .param("postingDay", self.posting_day.map(|day| day.format("%Y-%m-%d")))
            .param("spaceKey", self.space_key)
            .param("start", self.start)
            .param("status", self.status.map(|s| s.identifier()))
            .param("title", self.title)
            .param("trigger", self.trigger)
            .param("type", self.content_type)
            .expand(self.expand.as_ref())
            .finish();

        Ok(Request::with_parts(
            Operation::GetContent,
            HttpMethod::Get,
            CONTENT_PATH.to_string(),
            query,
            None,
        ))
    }
}

/// Limit and start, when given, must both be at least 1.
pub(crate) fn validate_paging(limit: Option<i32>, start: Option<i32>) -> Result<(), BuildError> {
    if limit.is_some_and(|limit| limit <= 0) {
        return Err(BuildError::NonPositiveLimit);
    }
    if start.is_some_and(|start| start <= 0) {
        return Err(BuildError::NonPositiveStart);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StandardContentType;

    fn single_param(builder: GetContent, key: &str, expected: &str) {
        let request = builder.build().unwrap();
        let params = request.query_params();
        assert_eq!(params.len(), 1, "only {key} expected, got {params:?}");
        assert_eq!(params.joined(key).as_deref(), Some(expected));
    }

    #[test]
    fn no_options_means_no_query() {
        let request = GetContent::new().build().unwrap();
        assert_eq!(request.method(), HttpMethod::Get);
        assert_eq!(request.relative_path(), "rest/api/content");
        assert!(request.query_params().is_empty());
        assert!(request.body().is_none());
    }

    #[test]
    fn each_option_maps_to_its_parameter() {
        single_param(GetContent::new().limit(123), "limit", "123");
        single_param(
            GetContent::new().order_by("somefield", SortDirection::Ascending),
            "orderBy",
            "somefield asc",
        );
        single_param(
            GetContent::new().posting_day(NaiveDate::from_ymd_opt(2018, 6, 27).unwrap()),
            "postingDay",
            "2018-06-27",
        );
        single_param(GetContent::new().space_key("TESTSPACE"), "spaceKey", "TESTSPACE");
        single_param(GetContent::new().start(123), "start", "123");
        single_param(GetContent::new().status(ContentStatus::Draft), "status", "draft");
        single_param(GetContent::new().title("Test title"), "title", "Test title");
        single_param(GetContent::new().trigger("viewed"), "trigger", "viewed");
        single_param(
            GetContent::new().content_type(StandardContentType::Page),
            "type",
            "page",
        );
    }

    #[test]
    fn descending_order() {
        single_param(
            GetContent::new().order_by("title", SortDirection::Descending),
            "orderBy",
            "title desc",
        );
    }

    #[test]
    fn expansion_is_comma_joined() {
        let request = GetContent::new()
            .expand(ContentExpansion::builder().space().ancestors().build())
            .build()
            .unwrap();
        assert_eq!(
            request.query_params().joined("expand").as_deref(),
            Some("ancestors,space")
        );
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        for limit in [0, -1, i32::MIN] {
            let err = GetContent::new().limit(limit).build().unwrap_err();
            assert_eq!(err, BuildError::NonPositiveLimit, "limit {limit}");
        }
        assert!(GetContent::new().limit(1).build().is_ok());
    }

    #[test]
    fn non_positive_start_is_rejected() {
        for start in [0, -5] {
            let err = GetContent::new().start(start).build().unwrap_err();
            assert_eq!(err, BuildError::NonPositiveStart, "start {start}");
            assert_eq!(err.to_string(), "The start position must be a positive number");
        }
        assert!(GetContent::new().start(1).build().is_ok());
    }
}
