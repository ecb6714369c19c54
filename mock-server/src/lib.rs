//! In-memory stand-in for the Confluence Cloud content and search API.
//!
//! Serves `/wiki/rest/api/content`, `/wiki/rest/api/content/{id}`,
//! `/wiki/rest/api/content/search` and `/wiki/rest/api/search` with enough
//! fidelity for the client's integration tests: structured JSON errors for
//! rejected requests, version conflicts on stale updates, a tiny CQL subset
//! and an HTML 404 page for everything else.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

const DEFAULT_LIMIT: usize = 25;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceRef {
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionRef {
    pub number: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AncestorRef {
    pub id: String,
}

/// A stored page or blog post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub status: String,
    pub title: String,
    pub space: SpaceRef,
    pub version: VersionRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<AncestorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Request body accepted by create and update. Everything is optional so
/// missing fields turn into Confluence-style validation errors instead of
/// extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct ContentInput {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub status: Option<String>,
    pub title: Option<String>,
    pub space: Option<SpaceRef>,
    pub version: Option<VersionRef>,
    pub ancestors: Option<Vec<AncestorRef>>,
    pub body: Option<Value>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub space_key: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub status: Option<String>,
    pub start: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub cql: Option<String>,
    pub cqlcontext: Option<String>,
    pub start: Option<usize>,
    pub limit: Option<usize>,
}

/// The decoded `cqlcontext` parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CqlContext {
    pub space_key: Option<String>,
    pub content_id: Option<String>,
}

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    contents: BTreeMap<u64, Content>,
}

#[derive(Debug, Default)]
struct AppState {
    store: RwLock<Store>,
    authorization: Option<String>,
}

type Shared = Arc<AppState>;

/// An anonymous server.
pub fn app() -> Router {
    router(AppState::default())
}

/// A server that rejects requests whose `Authorization` header is not
/// exactly `authorization`.
pub fn app_with_auth(authorization: impl Into<String>) -> Router {
    router(AppState {
        authorization: Some(authorization.into()),
        ..AppState::default()
    })
}

fn router(state: AppState) -> Router {
    let state: Shared = Arc::new(state);
    let api = Router::new()
        .route("/content", get(list_content).post(create_content))
        .route("/content/search", get(search_content))
        .route("/content/{id}", put(update_content).get(get_content_by_id))
        .route("/search", get(search))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);
    Router::new()
        .nest("/wiki/rest/api", api)
        .fallback(page_not_found)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_router(listener, app()).await
}

pub async fn run_router(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr()?, "mock confluence listening");
    axum::serve(listener, router).await
}

/// A Confluence-style JSON error.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
    translation: Option<String>,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            translation: None,
        }
    }

    /// A 400 carrying a structured validation error.
    fn invalid(translation: impl Into<String>) -> Self {
        let translation = translation.into();
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!(
                "com.atlassian.confluence.api.service.exceptions.BadRequestException: {translation}"
            ),
            translation: Some(translation),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let data = json!({
            "authorized": self.status != StatusCode::UNAUTHORIZED,
            "valid": self.translation.is_none(),
            "successful": false,
            "errors": self
                .translation
                .iter()
                .map(|t| json!({"message": {"translation": t, "args": []}}))
                .collect::<Vec<_>>(),
        });
        let body = json!({
            "statusCode": self.status.as_u16(),
            "message": self.message,
            "data": data,
        });
        (self.status, Json(body)).into_response()
    }
}

async fn require_auth(State(state): State<Shared>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.authorization {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return ApiFailure::new(StatusCode::UNAUTHORIZED, "Current user not permitted")
                .into_response();
        }
    }
    next.run(request).await
}

async fn page_not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<html>404 Page Not Found</html>"))
}

async fn create_content(
    State(state): State<Shared>,
    Json(input): Json<ContentInput>,
) -> Result<Json<Content>, ApiFailure> {
    let content_type = required(input.content_type, "Content type is required")?;
    let space = input
        .space
        .filter(|s| !s.key.is_empty())
        .ok_or_else(|| ApiFailure::invalid("Space is required"))?;
    let title = required(input.title, "Title is required")?;

    let mut store = state.store.write().await;
    let duplicate = store
        .contents
        .values()
        .any(|c| c.space.key == space.key && c.title == title && c.content_type == content_type);
    if duplicate {
        return Err(ApiFailure::invalid(
            "A page with this title already exists",
        ));
    }

    store.next_id += 1;
    let id = store.next_id;
    let content = Content {
        id: id.to_string(),
        content_type,
        status: input.status.unwrap_or_else(|| "current".to_string()),
        title,
        space,
        version: VersionRef { number: 1 },
        ancestors: input.ancestors.unwrap_or_default(),
        body: input.body,
        metadata: input.metadata,
    };
    store.contents.insert(id, content.clone());
    info!(id, title = %content.title, "created content");
    Ok(Json(content))
}

async fn list_content(
    State(state): State<Shared>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let store = state.store.read().await;
    let matches: Vec<Content> = store
        .contents
        .values()
        .filter(|c| params.space_key.as_ref().is_none_or(|k| &c.space.key == k))
        .filter(|c| params.title.as_ref().is_none_or(|t| &c.title == t))
        .filter(|c| params.content_type.as_ref().is_none_or(|t| &c.content_type == t))
        .filter(|c| params.status.as_ref().is_none_or(|s| &c.status == s))
        .cloned()
        .collect();
    let (results, start, limit) = paginate(matches, params.start, params.limit);
    Json(json!({
        "results": results,
        "start": start,
        "limit": limit,
        "size": results.len(),
    }))
}

async fn get_content_by_id(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiFailure> {
    let store = state.store.read().await;
    lookup(&store, &id).cloned().map(Json)
}

async fn update_content(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<ContentInput>,
) -> Result<Json<Content>, ApiFailure> {
    let mut store = state.store.write().await;
    let current = lookup(&store, &id)?.version.number;
    let key = id.parse::<u64>().map_err(|_| not_found(&id))?;

    let requested = input
        .version
        .ok_or_else(|| ApiFailure::invalid("Version is required"))?
        .number;
    if requested != current + 1 {
        return Err(ApiFailure::new(
            StatusCode::CONFLICT,
            format!("Version must be incremented on update. Current version is: {current}"),
        ));
    }

    let content = store.contents.get_mut(&key).ok_or_else(|| not_found(&id))?;
    if let Some(content_type) = input.content_type {
        content.content_type = content_type;
    }
    if let Some(title) = input.title {
        content.title = title;
    }
    if let Some(status) = input.status {
        content.status = status;
    }
    if let Some(ancestors) = input.ancestors {
        content.ancestors = ancestors;
    }
    if input.body.is_some() {
        content.body = input.body;
    }
    if input.metadata.is_some() {
        content.metadata = input.metadata;
    }
    content.version = VersionRef { number: requested };
    debug!(id = %content.id, version = requested, "updated content");
    Ok(Json(content.clone()))
}

async fn search_content(
    State(state): State<Shared>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiFailure> {
    let (cql, matches) = run_search(&state, &params).await?;
    let total = matches.len();
    let (results, start, limit) = paginate(matches, params.start, params.limit);
    Ok(Json(json!({
        "results": results,
        "start": start,
        "limit": limit,
        "size": results.len(),
        "totalSize": total,
        "cqlQuery": cql,
    })))
}

async fn search(
    State(state): State<Shared>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiFailure> {
    let (cql, matches) = run_search(&state, &params).await?;
    let total = matches.len();
    let (results, start, limit) = paginate(matches, params.start, params.limit);
    let results: Vec<Value> = results
        .into_iter()
        .map(|content| {
            json!({
                "title": content.title,
                "url": format!("/spaces/{}/pages/{}", content.space.key, content.id),
                "excerpt": "",
                "entityType": "content",
                "content": content,
            })
        })
        .collect();
    Ok(Json(json!({
        "results": results,
        "start": start,
        "limit": limit,
        "size": results.len(),
        "totalSize": total,
        "cqlQuery": cql,
    })))
}

async fn run_search(
    state: &Shared,
    params: &SearchParams,
) -> Result<(String, Vec<Content>), ApiFailure> {
    let cql = params
        .cql
        .clone()
        .filter(|cql| !cql.trim().is_empty())
        .ok_or_else(|| ApiFailure::invalid("cql is required"))?;
    let clauses = parse_cql(&cql)
        .ok_or_else(|| ApiFailure::invalid(format!("Could not parse cql : {cql}")))?;
    // A context with a space key restricts matches to that space.
    let context = params
        .cqlcontext
        .as_deref()
        .map(serde_json::from_str::<CqlContext>)
        .transpose()
        .map_err(|e| ApiFailure::invalid(format!("Could not parse cqlcontext : {e}")))?
        .unwrap_or_default();
    debug!(?context, "search context");

    let store = state.store.read().await;
    let matches = store
        .contents
        .values()
        .filter(|c| context.space_key.as_ref().map_or(true, |k| &c.space.key == k))
        .filter(|c| clauses.iter().all(|clause| clause.matches(c)))
        .cloned()
        .collect();
    Ok((cql, matches))
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiFailure> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiFailure::invalid(message))
}

fn not_found(id: &str) -> ApiFailure {
    ApiFailure::new(
        StatusCode::NOT_FOUND,
        format!("No content found with id: ContentId{{id={id}}}"),
    )
}

fn lookup<'a>(store: &'a Store, id: &str) -> Result<&'a Content, ApiFailure> {
    id.parse::<u64>()
        .ok()
        .and_then(|key| store.contents.get(&key))
        .ok_or_else(|| not_found(id))
}

fn paginate(
    items: Vec<Content>,
    start: Option<usize>,
    limit: Option<usize>,
) -> (Vec<Content>, usize, usize) {
    let start = start.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let page = items.into_iter().skip(start).take(limit).collect();
    (page, start, limit)
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Equals(Field, String),
    Contains(Field, String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Space,
    Type,
    Title,
}

impl Field {
    fn value<'a>(&self, content: &'a Content) -> &'a str {
        match self {
            Field::Space => &content.space.key,
            Field::Type => &content.content_type,
            Field::Title => &content.title,
        }
    }
}

impl Clause {
    fn matches(&self, content: &Content) -> bool {
        match self {
            Clause::Equals(field, value) => field.value(content) == value,
            Clause::Contains(field, value) => field
                .value(content)
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// Parse `field=value` and `field~value` clauses joined by `AND`. Values may
/// be single- or double-quoted. Anything else is a parse failure.
fn parse_cql(cql: &str) -> Option<Vec<Clause>> {
    cql.split(" AND ")
        .flat_map(|part| part.split(" and "))
        .map(|clause| {
            let (op_at, op) = clause.char_indices().find(|(_, c)| *c == '=' || *c == '~')?;
            let field = match clause[..op_at].trim() {
                "space" => Field::Space,
                "type" => Field::Type,
                "title" => Field::Title,
                _ => return None,
            };
            let value = unquote(clause[op_at + 1..].trim())?;
            Some(if op == '=' {
                Clause::Equals(field, value)
            } else {
                Clause::Contains(field, value)
            })
        })
        .collect()
}

fn unquote(raw: &str) -> Option<String> {
    let inner = ['"', '\'']
        .iter()
        .find_map(|q| raw.strip_prefix(*q).and_then(|r| r.strip_suffix(*q)))
        .unwrap_or(raw);
    (!inner.is_empty()).then(|| inner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cql_single_clause() {
        assert_eq!(
            parse_cql("space=DOC"),
            Some(vec![Clause::Equals(Field::Space, "DOC".to_string())])
        );
    }

    #[test]
    fn cql_conjunction_with_quotes() {
        assert_eq!(
            parse_cql(r#"type = page AND title ~ "release notes""#),
            Some(vec![
                Clause::Equals(Field::Type, "page".to_string()),
                Clause::Contains(Field::Title, "release notes".to_string()),
            ])
        );
    }

    #[test]
    fn cql_rejects_unknown_fields_and_garbage() {
        assert_eq!(parse_cql("label=foo"), None);
        assert_eq!(parse_cql("not cql at all"), None);
        assert_eq!(parse_cql("title=''"), None);
    }
}
