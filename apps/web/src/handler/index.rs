//! トップページ

use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

/// GET /
///
/// 常にログインページへリダイレクトする（302 Found）。
/// セッションは参照しない。
pub async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/login")])
}
