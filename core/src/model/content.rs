use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::space::Space;
use super::user::User;

/// A page, blog post, comment or attachment.
///
/// Every field is optional: requests only carry what the caller set, and
/// responses only carry what the server returned (plus whatever was asked
/// for through expansions).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<Space>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<Content>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ContentBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Content {
    /// A reference to existing content carrying nothing but its id.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Body representations keyed by format identifier (`storage`, `view`, ...).
///
/// Identifiers the server knows but [`ContentBodyType`] does not are kept
/// as-is so responses survive new formats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBody(BTreeMap<String, ContentBodyFormat>);

impl ContentBody {
    /// A body holding exactly one format.
    pub fn single(kind: ContentBodyType, value: impl Into<String>) -> Self {
        let mut body = Self::default();
        body.insert(kind, ContentBodyFormat::with_value(value));
        body
    }

    /// Set the representation for `kind`, replacing any previous one.
    pub fn insert(&mut self, kind: ContentBodyType, format: ContentBodyFormat) {
        self.0.insert(kind.identifier().to_string(), format);
    }

    pub fn get(&self, kind: ContentBodyType) -> Option<&ContentBodyFormat> {
        self.0.get(kind.identifier())
    }

    /// Lookup by raw identifier, including formats without a typed variant.
    pub fn get_raw(&self, identifier: &str) -> Option<&ContentBodyFormat> {
        self.0.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentBodyFormat)> {
        self.0.iter().map(|(key, format)| (key.as_str(), format))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBodyFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,
}

impl ContentBodyFormat {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            representation: None,
        }
    }
}

/// The body formats Confluence can store or render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentBodyType {
    #[serde(rename = "anonymous_export_view")]
    AnonymousExportView,
    #[serde(rename = "editor2")]
    Editor2,
    #[serde(rename = "export_view")]
    ExportView,
    #[serde(rename = "storage")]
    Storage,
    #[serde(rename = "styled_view")]
    StyledView,
    #[serde(rename = "view")]
    View,
}

impl ContentBodyType {
    pub const ALL: [ContentBodyType; 6] = [
        ContentBodyType::AnonymousExportView,
        ContentBodyType::Editor2,
        ContentBodyType::ExportView,
        ContentBodyType::Storage,
        ContentBodyType::StyledView,
        ContentBodyType::View,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            ContentBodyType::AnonymousExportView => "anonymous_export_view",
            ContentBodyType::Editor2 => "editor2",
            ContentBodyType::ExportView => "export_view",
            ContentBodyType::Storage => "storage",
            ContentBodyType::StyledView => "styled_view",
            ContentBodyType::View => "view",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Current,
    Trashed,
    Historical,
    Draft,
    /// A status newer than this client; only ever produced by parsing.
    #[serde(other)]
    Unknown,
}

impl ContentStatus {
    pub fn identifier(&self) -> &'static str {
        match self {
            ContentStatus::Current => "current",
            ContentStatus::Trashed => "trashed",
            ContentStatus::Historical => "historical",
            ContentStatus::Draft => "draft",
            ContentStatus::Unknown => "unknown",
        }
    }
}

/// The content types every Confluence instance ships with. Builders also
/// accept arbitrary strings for custom content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardContentType {
    Page,
    BlogPost,
    Comment,
    Attachment,
}

impl StandardContentType {
    pub fn identifier(&self) -> &'static str {
        match self {
            StandardContentType::Page => "page",
            StandardContentType::BlogPost => "blogpost",
            StandardContentType::Comment => "comment",
            StandardContentType::Attachment => "attachment",
        }
    }
}

impl From<StandardContentType> for String {
    fn from(kind: StandardContentType) -> Self {
        kind.identifier().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn identifier(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPrefix {
    #[default]
    Global,
    My,
    Team,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub prefix: LabelPrefix,
    pub name: String,
}

impl Label {
    pub fn new(prefix: LabelPrefix, name: impl Into<String>) -> Self {
        Self {
            prefix,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_labels"
    )]
    pub labels: Option<Vec<Label>>,
}

/// Labels arrive either as a bare array or, when expanded, wrapped in a
/// paginated `{"results": [...]}` envelope.
fn deserialize_labels<'de, D>(deserializer: D) -> Result<Option<Vec<Label>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Labels {
        List(Vec<Label>),
        Page { results: Vec<Label> },
    }

    Ok(Option::<Labels>::deserialize(deserializer)?.map(|labels| match labels {
        Labels::List(list) => list,
        Labels::Page { results } => results,
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_edit: Option<bool>,
}

impl Version {
    pub fn number(number: u32) -> Self {
        Self {
            number: Some(number),
            ..Self::default()
        }
    }
}
