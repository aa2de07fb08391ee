//! Embedded single-page UI

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET / - Upload sidebar and chat area
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
