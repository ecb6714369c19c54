//! Typed client core for the Confluence Cloud REST API.
//!
//! # Overview
//! Operation builders ([`CreateContent`], [`GetContent`], [`UpdateContent`],
//! [`Search`]) validate their inputs and produce immutable [`Request`]
//! values. [`ConfluenceClient`] turns a request into plain [`HttpRequest`]
//! data and classifies the [`HttpResponse`] that comes back. The network
//! round-trip itself belongs to the caller, either directly or through an
//! implementation of [`Transport`].
//!
//! # Design
//! - Requests carry their success type as a type parameter, so a response is
//!   always parsed into the type its operation promises.
//! - Expansion selectors are built from scope-typed property sets; a property
//!   from one scope cannot be attached to another scope.
//! - Query options that were never set are absent from the URL entirely.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod expand;
pub mod http;
pub mod model;
pub mod query;
pub mod request;

pub use auth::Auth;
pub use client::ConfluenceClient;
pub use config::ClientConfig;
pub use error::{ApiError, BuildError, ConfigError, ErrorData, ErrorResponse, RequestFailure};
pub use expand::{ContentExpansion, Properties};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use model::{
    Content, ContentBodyType, ContentPage, ContentSearchResults, ContentStatus, CqlContext,
    Excerpt, LabelPrefix, SearchResults, SortDirection, StandardContentType,
};
pub use query::QueryParams;
pub use request::{CreateContent, GetContent, Operation, Request, Search, UpdateContent};
