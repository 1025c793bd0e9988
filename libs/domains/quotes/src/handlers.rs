use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use axum_helpers::IdPath;
use std::sync::Arc;

use crate::error::QuoteResult;
use crate::models::{Quote, QuoteMatch, QuoteQuery};
use crate::repository::QuoteRepository;
use crate::service::QuoteService;

const SEARCH_PAGE: &str = include_str!("../assets/search.html");

/// Query string of `GET /quotes`
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub author: Option<String>,
    pub query: Option<String>,
}

impl SearchParams {
    /// First value wins when a parameter is repeated; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "author" => &mut params.author,
                "query" => &mut params.query,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// Create the quotes router with all HTTP endpoints
pub fn router<R: QuoteRepository + 'static>(service: QuoteService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/quotes", get(search_quotes))
        .route("/quote/{id}", get(get_quote))
        .route("/page/", get(search_page))
        .with_state(shared_service)
}

/// Author listing, semantic search or full listing, by parameter precedence
async fn search_quotes<R: QuoteRepository>(
    State(service): State<Arc<QuoteService<R>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> QuoteResult<Json<Vec<QuoteMatch>>> {
    let params = SearchParams::from_pairs(pairs);
    let query = QuoteQuery::from_params(params.author.as_deref(), params.query.as_deref());
    let results = service.search(query).await?;
    Ok(Json(results.rows))
}

async fn get_quote<R: QuoteRepository>(
    State(service): State<Arc<QuoteService<R>>>,
    IdPath(id): IdPath,
) -> QuoteResult<Json<Quote>> {
    let quote = service.get_quote(id).await?;
    Ok(Json(quote))
}

async fn search_page() -> Html<&'static str> {
    Html(SEARCH_PAGE)
}
