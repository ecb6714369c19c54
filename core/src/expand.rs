//! Typed construction of `expand` property paths.
//!
//! # Design
//! Confluence only populates nested properties (`body.storage.value`,
//! `history.lastUpdated`, ...) when asked through the `expand` query
//! parameter. Paths are never typed in by hand: every leaf is a fixed string
//! behind a named builder method, so a misspelt path cannot reach the wire.
//!
//! A single generic [`Properties`] type covers every nested resource. The
//! scope marker (`History`, `Metadata`, ...) decides which leaf methods are
//! available and which namespace the leaves land under when they are folded
//! into a [`ContentExpansion`]. Finished property sets are immutable and can
//! be folded any number of times.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use crate::model::ContentBodyType;

/// A nested resource that can be expanded under a fixed namespace.
pub trait Scope {
    const NAMESPACE: &'static str;
}

/// Leaves of a single body format (`body.<format>.<leaf>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildTypes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Children;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descendants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restrictions;

impl Scope for ChildTypes {
    const NAMESPACE: &'static str = "childTypes";
}

impl Scope for Children {
    const NAMESPACE: &'static str = "children";
}

impl Scope for Descendants {
    const NAMESPACE: &'static str = "descendants";
}

impl Scope for History {
    const NAMESPACE: &'static str = "history";
}

impl Scope for Metadata {
    const NAMESPACE: &'static str = "metadata";
}

impl Scope for Restrictions {
    const NAMESPACE: &'static str = "restrictions";
}

pub type BodyFormatProperties = Properties<BodyFormat>;
pub type ChildTypeProperties = Properties<ChildTypes>;
pub type ChildrenProperties = Properties<Children>;
pub type DescendantsProperties = Properties<Descendants>;
pub type HistoryProperties = Properties<History>;
pub type MetadataProperties = Properties<Metadata>;
pub type RestrictionProperties = Properties<Restrictions>;

/// A finished, read-only set of leaf names for one scope.
pub struct Properties<S> {
    leaves: BTreeSet<&'static str>,
    scope: PhantomData<S>,
}

impl<S> Properties<S> {
    pub fn builder() -> PropertiesBuilder<S> {
        PropertiesBuilder {
            leaves: BTreeSet::new(),
            scope: PhantomData,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.leaves.iter().copied()
    }

    pub fn contains(&self, leaf: &str) -> bool {
        self.leaves.contains(leaf)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

impl<S> Clone for Properties<S> {
    fn clone(&self) -> Self {
        Self {
            leaves: self.leaves.clone(),
            scope: PhantomData,
        }
    }
}

impl<S> PartialEq for Properties<S> {
    fn eq(&self, other: &Self) -> bool {
        self.leaves == other.leaves
    }
}

impl<S> Eq for Properties<S> {}

impl<S> fmt::Debug for Properties<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.leaves).finish()
    }
}

/// Accumulates leaves for one scope. Adding a leaf twice is a no-op.
pub struct PropertiesBuilder<S> {
    leaves: BTreeSet<&'static str>,
    scope: PhantomData<S>,
}

impl<S> PropertiesBuilder<S> {
    fn leaf(mut self, name: &'static str) -> Self {
        self.leaves.insert(name);
        self
    }

    pub fn build(self) -> Properties<S> {
        Properties {
            leaves: self.leaves,
            scope: PhantomData,
        }
    }
}

impl PropertiesBuilder<BodyFormat> {
    pub fn value(self) -> Self {
        self.leaf("value")
    }

    pub fn representation(self) -> Self {
        self.leaf("representation")
    }

    pub fn web_resource(self) -> Self {
        self.leaf("webresource")
    }

    pub fn embedded_content(self) -> Self {
        self.leaf("embeddedContent")
    }

    pub fn media_token(self) -> Self {
        self.leaf("mediaToken")
    }
}

impl PropertiesBuilder<ChildTypes> {
    pub fn all(self) -> Self {
        self.leaf("all")
    }

    pub fn attachment(self) -> Self {
        self.leaf("attachment")
    }

    pub fn comment(self) -> Self {
        self.leaf("comment")
    }

    pub fn page(self) -> Self {
        self.leaf("page")
    }
}

impl PropertiesBuilder<Children> {
    pub fn page(self) -> Self {
        self.leaf("page")
    }

    pub fn comment(self) -> Self {
        self.leaf("comment")
    }

    pub fn attachment(self) -> Self {
        self.leaf("attachment")
    }
}

impl PropertiesBuilder<Descendants> {
    pub fn page(self) -> Self {
        self.leaf("page")
    }

    pub fn comment(self) -> Self {
        self.leaf("comment")
    }

    pub fn attachment(self) -> Self {
        self.leaf("attachment")
    }
}

impl PropertiesBuilder<History> {
    pub fn last_updated(self) -> Self {
        self.leaf("lastUpdated")
    }

    pub fn previous_version(self) -> Self {
        self.leaf("previousVersion")
    }

    pub fn contributors(self) -> Self {
        self.leaf("contributors")
    }

    pub fn next_version(self) -> Self {
        self.leaf("nextVersion")
    }
}

impl PropertiesBuilder<Metadata> {
    pub fn current_user(self) -> Self {
        self.leaf("currentuser")
    }

    pub fn properties(self) -> Self {
        self.leaf("properties")
    }

    pub fn labels(self) -> Self {
        self.leaf("labels")
    }

    pub fn frontend(self) -> Self {
        self.leaf("frontend")
    }
}

impl PropertiesBuilder<Restrictions> {
    pub fn read_users(self) -> Self {
        self.leaf("read.restrictions.user")
    }

    pub fn read_groups(self) -> Self {
        self.leaf("read.restrictions.group")
    }

    pub fn update_users(self) -> Self {
        self.leaf("update.restrictions.user")
    }

    pub fn update_groups(self) -> Self {
        self.leaf("update.restrictions.group")
    }
}

/// The complete set of dotted paths requested for a content response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentExpansion {
    paths: BTreeSet<String>,
}

impl ContentExpansion {
    pub fn builder() -> ContentExpansionBuilder {
        ContentExpansionBuilder::default()
    }

    /// Paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentExpansionBuilder {
    paths: BTreeSet<String>,
}

impl ContentExpansionBuilder {
    fn leaf(mut self, name: &str) -> Self {
        self.paths.insert(name.to_string());
        self
    }

    fn prefixed<S>(mut self, prefix: &str, properties: &Properties<S>) -> Self {
        self.paths
            .extend(properties.iter().map(|leaf| format!("{prefix}.{leaf}")));
        self
    }

    fn scoped<S: Scope>(self, properties: &Properties<S>) -> Self {
        self.prefixed(S::NAMESPACE, properties)
    }

    pub fn ancestors(self) -> Self {
        self.leaf("ancestors")
    }

    pub fn container(self) -> Self {
        self.leaf("container")
    }

    pub fn operations(self) -> Self {
        self.leaf("operations")
    }

    pub fn space(self) -> Self {
        self.leaf("space")
    }

    pub fn version(self) -> Self {
        self.leaf("version")
    }

    /// Expand leaves of one body format, e.g. `body.storage.value`.
    pub fn body(self, kind: ContentBodyType, properties: &BodyFormatProperties) -> Self {
        let prefix = format!("body.{}", kind.identifier());
        self.prefixed(&prefix, properties)
    }

    pub fn child_types(self, properties: &ChildTypeProperties) -> Self {
        self.scoped(properties)
    }

    pub fn children(self, properties: &ChildrenProperties) -> Self {
        self.scoped(properties)
    }

    pub fn descendants(self, properties: &DescendantsProperties) -> Self {
        self.scoped(properties)
    }

    pub fn history(self, properties: &HistoryProperties) -> Self {
        self.scoped(properties)
    }

    pub fn metadata(self, properties: &MetadataProperties) -> Self {
        self.scoped(properties)
    }

    pub fn restrictions(self, properties: &RestrictionProperties) -> Self {
        self.scoped(properties)
    }

    pub fn build(self) -> ContentExpansion {
        ContentExpansion { paths: self.paths }
    }
}
