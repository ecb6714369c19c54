use crate::error::BuildError;
use crate::expand::ContentExpansion;
use crate::http::HttpMethod;
use crate::model::{
    Content, ContentBody, ContentBodyType, ContentStatus, Label, LabelPrefix, Metadata, Space,
};
use crate::query::QueryEncoder;

use super::{non_empty, Operation, Request, CONTENT_PATH};

/// Builder for `POST rest/api/content`.
///
/// `content_type` and `space_key` are mandatory; a draft additionally needs
/// an explicit `id`.
#[derive(Debug, Clone, Default)]
pub struct CreateContent {
    id: Option<String>,
    content_type: Option<String>,
    title: Option<String>,
    space_key: Option<String>,
    status: Option<ContentStatus>,
    ancestor_id: Option<String>,
    body: Option<(ContentBodyType, String)>,
    labels: Vec<Label>,
    response_status: Option<ContentStatus>,
    expand: Option<ContentExpansion>,
}

impl CreateContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `page`, `blogpost`, ... or a custom content type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn space_key(mut self, key: impl Into<String>) -> Self {
        self.space_key = Some(key.into());
        self
    }

    pub fn status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Parent content, referenced by id only.
    pub fn ancestor(mut self, id: impl Into<String>) -> Self {
        self.ancestor_id = Some(id.into());
        self
    }

    /// The body in one format. Calling this again replaces the previous body.
    pub fn body(mut self, kind: ContentBodyType, value: impl Into<String>) -> Self {
        self.body = Some((kind, value.into()));
        self
    }

    pub fn label(self, name: impl Into<String>) -> Self {
        self.label_with_prefix(name, LabelPrefix::Global)
    }

    pub fn label_with_prefix(mut self, name: impl Into<String>, prefix: LabelPrefix) -> Self {
        self.labels.push(Label::new(prefix, name));
        self
    }

    /// Only return the created content if it ends up in this status.
    pub fn response_status(mut self, status: ContentStatus) -> Self {
        self.response_status = Some(status);
        self
    }

    pub fn expand(mut self, expansion: ContentExpansion) -> Self {
        self.expand = Some(expansion);
        self
    }

    pub fn build(self) -> Result<Request<Content>, BuildError> {
        let content_type = non_empty(&self.content_type)
            .ok_or(BuildError::MissingCreateType)?
            .to_string();
        let space_key = non_empty(&self.space_key)
            .ok_or(BuildError::MissingSpaceKey)?
            .to_string();
        if self.status == Some(ContentStatus::Draft) && non_empty(&self.id).is_none() {
            return Err(BuildError::DraftWithoutId);
        }

        let query = QueryEncoder::new()
            .param("status", self.response_status.map(|s| s.identifier()))
            .expand(self.expand.as_ref())
            .finish();

        let content = Content {
            id: self.id,
            content_type: Some(content_type),
            status: self.status,
            title: self.title,
            space: Some(Space::with_key(space_key)),
            ancestors: self.ancestor_id.map(|id| vec![Content::reference(id)]),
            body: self.body.map(|(kind, value)| ContentBody::single(kind, value)),
            version: None,
            metadata: labels_metadata(self.labels),
        };

        Ok(Request::with_parts(
            Operation::CreateContent,
            HttpMethod::Post,
            CONTENT_PATH.to_string(),
            query,
            Some(content),
        ))
    }
}

/// A `metadata` block only when at least one label was added.
pub(crate) fn labels_metadata(labels: Vec<Label>) -> Option<Metadata> {
    if labels.is_empty() {
        None
    } else {
        Some(Metadata {
            labels: Some(labels),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::{BodyFormatProperties, ContentExpansion};
    use crate::model::StandardContentType;
    use serde_json::json;

    fn body_json(request: &Request<Content>) -> serde_json::Value {
        serde_json::to_value(request.body().unwrap()).unwrap()
    }

    #[test]
    fn mandatory_fields_only() {
        let request = CreateContent::new()
            .content_type(StandardContentType::Page)
            .space_key("TEST")
            .body(ContentBodyType::View, "<html>X</html>")
            .build()
            .unwrap();
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.relative_path(), "rest/api/content");
        assert_eq!(request.operation(), Operation::CreateContent);
        assert!(request.query_params().is_empty());
        assert_eq!(
            body_json(&request),
            json!({
                "type": "page",
                "space": {"key": "TEST"},
                "body": {"view": {"value": "<html>X</html>"}}
            })
        );
    }

    #[test]
    fn without_body_only_mandatory_attributes_are_sent() {
        let request = CreateContent::new()
            .content_type("page")
            .space_key("TEST")
            .build()
            .unwrap();
        assert_eq!(body_json(&request), json!({"type": "page", "space": {"key": "TEST"}}));
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = CreateContent::new().space_key("TEST").build().unwrap_err();
        assert_eq!(err, BuildError::MissingCreateType);
        assert_eq!(
            err.to_string(),
            "You must specify the type of content you want to create"
        );
    }

    #[test]
    fn empty_type_is_rejected() {
        let err = CreateContent::new()
            .content_type("")
            .space_key("TEST")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::MissingCreateType);
    }

    #[test]
    fn missing_space_is_rejected() {
        let err = CreateContent::new().content_type("page").build().unwrap_err();
        assert_eq!(err, BuildError::MissingSpaceKey);
    }

    #[test]
    fn draft_requires_id() {
        let err = CreateContent::new()
            .content_type("page")
            .space_key("TEST")
            .status(ContentStatus::Draft)
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::DraftWithoutId);

        let request = CreateContent::new()
            .content_type("page")
            .space_key("TEST")
            .status(ContentStatus::Draft)
            .id("123")
            .build()
            .unwrap();
        let body = body_json(&request);
        assert_eq!(body["id"], "123");
        assert_eq!(body["status"], "draft");
    }

    #[test]
    fn last_body_wins() {
        let request = CreateContent::new()
            .content_type(StandardContentType::Attachment)
            .space_key("TESTSPACE")
            .body(ContentBodyType::Editor2, "<html>TEST</html>")
            .body(ContentBodyType::Storage, "<html>TEST</html>")
            .body(ContentBodyType::View, "<html>TEST</html>")
            .body(ContentBodyType::ExportView, "<html>TEST</html>")
            .body(ContentBodyType::StyledView, "<html>TEST</html>")
            .body(ContentBodyType::AnonymousExportView, "<html>LAST</html>")
            .build()
            .unwrap();
        assert_eq!(
            body_json(&request)["body"],
            json!({"anonymous_export_view": {"value": "<html>LAST</html>"}})
        );
    }

    #[test]
    fn ancestor_is_a_bare_reference() {
        let request = CreateContent::new()
            .content_type(StandardContentType::Comment)
            .space_key("TESTSPACE")
            .ancestor("123")
            .build()
            .unwrap();
        assert_eq!(body_json(&request)["ancestors"], json!([{"id": "123"}]));
    }

    #[test]
    fn response_status_becomes_query_param() {
        let request = CreateContent::new()
            .content_type(StandardContentType::Comment)
            .space_key("TESTSPACE")
            .response_status(ContentStatus::Historical)
            .build()
            .unwrap();
        assert_eq!(request.query_params().joined("status").as_deref(), Some("historical"));
        assert!(body_json(&request).get("status").is_none());
    }

    #[test]
    fn labels_keep_insertion_order() {
        let request = CreateContent::new()
            .content_type(StandardContentType::Page)
            .space_key("TESTSPACE")
            .label("global-label")
            .label_with_prefix("team-label", LabelPrefix::Team)
            .label_with_prefix("my-label", LabelPrefix::My)
            .build()
            .unwrap();
        assert_eq!(
            body_json(&request)["metadata"],
            json!({"labels": [
                {"prefix": "global", "name": "global-label"},
                {"prefix": "team", "name": "team-label"},
                {"prefix": "my", "name": "my-label"}
            ]})
        );
    }

    #[test]
    fn no_labels_means_no_metadata() {
        let request = CreateContent::new()
            .content_type("page")
            .space_key("TEST")
            .build()
            .unwrap();
        assert!(body_json(&request).get("metadata").is_none());
    }

    #[test]
    fn expansion_becomes_query_param() {
        let format = BodyFormatProperties::builder().value().build();
        let request = CreateContent::new()
            .content_type("page")
            .space_key("TEST")
            .expand(
                ContentExpansion::builder()
                    .body(ContentBodyType::Storage, &format)
                    .version()
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(
            request.query_params().joined("expand").as_deref(),
            Some("body.storage.value,version")
        );
    }

    #[test]
    fn body_round_trips_into_content() {
        let request = CreateContent::new()
            .content_type("blogpost")
            .title("Release notes")
            .space_key("DOC")
            .body(ContentBodyType::Storage, "<p>v1</p>")
            .label("release")
            .build()
            .unwrap();
        let json = serde_json::to_string(request.body().unwrap()).unwrap();
        let back: Content = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, request.body().unwrap());
        assert_eq!(back.title.as_deref(), Some("Release notes"));
    }
}
