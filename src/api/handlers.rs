use axum::extract::{Query, State};
use axum::response::Html;
use std::sync::Arc;

use crate::news_api::NewsClient;
use crate::search::{PAGE_SIZE, Search, parse_page};

use super::AppState;
use super::error::AppError;
use super::models::{HeadlinesParams, SearchParams};

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let html = state.template.render(None).inspect_err(|e| {
        tracing::error!(error = %e, "failed to render index");
    })?;
    Ok(Html(html))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    tracing::info!(query = %params.q, page = ?params.page, "search request");

    let search = run_search(&state.news, &params).await.inspect_err(|e| {
        tracing::error!(query = %params.q, page = ?params.page, error = %e, "search failed");
    })?;

    let html = state.template.render(Some(&search)).inspect_err(|e| {
        tracing::error!(query = %params.q, error = %e, "failed to render search results");
    })?;
    Ok(Html(html))
}

pub async fn top_headlines_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HeadlinesParams>,
) -> Result<Html<String>, AppError> {
    let search = run_headlines(&state.news, &params).await.inspect_err(|e| {
        tracing::error!(page = ?params.page, error = %e, "top headlines failed");
    })?;

    let html = state.template.render(Some(&search)).inspect_err(|e| {
        tracing::error!(error = %e, "failed to render top headlines");
    })?;
    Ok(Html(html))
}

/// Fetch one page of search results and build the matching search state.
pub async fn run_search(news: &NewsClient, params: &SearchParams) -> Result<Search, AppError> {
    let page = parse_page(params.page.as_deref())?;
    let mut search = Search::new(params.q.as_str(), page);

    let results = news.everything(&search.search_key, PAGE_SIZE, search.next_page).await?;
    search.apply_results(results, PAGE_SIZE);
    Ok(search)
}

/// Fetch the headlines feed. The feed is always requested unpaginated, so the
/// page parameter is only looked at for the log and can never fail a request.
pub async fn run_headlines(
    news: &NewsClient,
    params: &HeadlinesParams,
) -> Result<Search, AppError> {
    match parse_page(params.page.as_deref()) {
        Ok(page) => tracing::debug!(page, "top headlines request"),
        Err(e) => tracing::debug!(error = %e, "ignoring page on top headlines"),
    }

    let mut search = Search::headlines();
    let results = news.top_headlines().await?;
    search.apply_headlines(results);
    Ok(search)
}
