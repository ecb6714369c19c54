use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::model::{Content, ContentBody, ContentBodyType, ContentStatus, Label, LabelPrefix, Version};
use crate::query::QueryParams;

use super::create::labels_metadata;
use super::{non_empty, Operation, Request, CONTENT_PATH};

/// Builder for `PUT rest/api/content/{id}`.
///
/// `id`, `content_type` and the new `version` number are mandatory.
/// Confluence rejects the update unless the version is exactly one above the
/// current one; that check happens server-side.
#[derive(Debug, Clone, Default)]
pub struct UpdateContent {
    id: Option<String>,
    content_type: Option<String>,
    version: Option<u32>,
    title: Option<String>,
    status: Option<ContentStatus>,
    ancestor_id: Option<String>,
    body: Option<(ContentBodyType, String)>,
    labels: Vec<Label>,
}

impl UpdateContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn version(mut self, number: u32) -> Self {
        self.version = Some(number);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Move the content under a new parent, referenced by id only.
    pub fn ancestor(mut self, id: impl Into<String>) -> Self {
        self.ancestor_id = Some(id.into());
        self
    }

    /// The new body in one format. Calling this again replaces the previous body.
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

    pub fn build(self) -> Result<Request<Content>, BuildError> {
        let id = non_empty(&self.id)
            .ok_or(BuildError::MissingUpdateId)?
            .to_string();
        let content_type = non_empty(&self.content_type)
            .ok_or(BuildError::MissingUpdateType)?
            .to_string();
        let version = self.version.ok_or(BuildError::MissingVersion)?;

        let content = Content {
            id: None,
            content_type: Some(content_type),
            status: self.status,
            title: self.title,
            space: None,
            ancestors: self.ancestor_id.map(|id| vec![Content::reference(id)]),
            body: self.body.map(|(kind, value)| ContentBody::single(kind, value)),
            version: Some(Version::number(version)),
            metadata: labels_metadata(self.labels),
        };

        Ok(Request::with_parts(
            Operation::UpdateContent,
            HttpMethod::Put,
            format!("{CONTENT_PATH}/{id}"),
            QueryParams::new(),
            Some(content),
        ))
    }
}
