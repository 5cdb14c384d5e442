use crate::AppState;
use axum::Router;

pub mod news;

pub fn create_api_router<S: AppState>() -> Router<S> {
    Router::new().nest("/news", news::create_news_router())
}
