//! Domain types exchanged with the Confluence REST API.
//!
//! # Design
//! These are plain attribute bags. Every field is optional so a value
//! deserialized from the server says exactly what the payload contained,
//! and a value serialized into a request says exactly what the caller set.
//! Unknown JSON fields are ignored.

mod content;
mod search;
mod space;
mod user;

pub use content::{
    Content, ContentBody, ContentBodyFormat, ContentBodyType, ContentStatus, Label, LabelPrefix,
    Metadata, SortDirection, StandardContentType, Version,
};
pub use search::{
    ContentPage, ContentSearchResults, CqlContext, Excerpt, SearchResult, SearchResultContainer,
    SearchResults,
};
pub use space::{Space, SpaceDescription, SpaceDescriptionPlain, SpaceStatus, SpaceType};
pub use user::{ProfilePicture, User, UserType};
