//! Immutable descriptions of Confluence REST calls.
//!
//! # Design
//! A [`Request<R>`] is produced by one of the operation builders
//! ([`CreateContent`], [`GetContent`], [`UpdateContent`], [`Search`]) and is
//! never changed afterwards. All validation happens in the builder's
//! `build()`, so a `Request` that exists is always well-formed. The type
//! parameter `R` names the type the success body deserializes into; it is
//! never stored.

mod create;
mod get;
mod search;
mod update;

use std::fmt;
use std::marker::PhantomData;

use crate::http::{HttpMethod, APPLICATION_JSON};
use crate::model::Content;
use crate::query::QueryParams;

pub use create::CreateContent;
pub use get::GetContent;
pub use search::Search;
pub use update::UpdateContent;

/// Path of the content collection relative to the wiki root.
pub(crate) const CONTENT_PATH: &str = "rest/api/content";

/// Which operation produced a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateContent,
    GetContent,
    UpdateContent,
    Search,
    SearchContent,
    Custom,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateContent => "create_content",
            Operation::GetContent => "get_content",
            Operation::UpdateContent => "update_content",
            Operation::Search => "search",
            Operation::SearchContent => "search_content",
            Operation::Custom => "custom",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP call against the Confluence REST API, prior to execution.
pub struct Request<R> {
    operation: Operation,
    method: HttpMethod,
    relative_path: String,
    query: QueryParams,
    body: Option<Content>,
    content_type: &'static str,
    accept: &'static str,
    response: PhantomData<fn() -> R>,
}

impl<R> Request<R> {
    /// A request for an endpoint without a dedicated builder: empty query,
    /// no body, JSON in both directions.
    pub fn new(method: HttpMethod, relative_path: impl Into<String>) -> Self {
        Self::with_parts(
            Operation::Custom,
            method,
            relative_path.into(),
            QueryParams::new(),
            None,
        )
    }

    pub(crate) fn with_parts(
        operation: Operation,
        method: HttpMethod,
        relative_path: String,
        query: QueryParams,
        body: Option<Content>,
    ) -> Self {
        Self {
            operation,
            method,
            relative_path,
            query,
            body,
            content_type: APPLICATION_JSON,
            accept: APPLICATION_JSON,
            response: PhantomData,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path relative to the wiki root, e.g. `rest/api/content`.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> Option<&Content> {
        self.body.as_ref()
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn accept(&self) -> &str {
        self.accept
    }
}

impl<R> fmt::Debug for Request<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("operation", &self.operation)
            .field("method", &self.method)
            .field("relative_path", &self.relative_path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("response", &std::any::type_name::<R>())
            .finish()
    }
}

/// Treat empty strings the same as unset values.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
