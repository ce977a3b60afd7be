//! # キャッシュ制御ミドルウェア
//!
//! ログイン結果やアクセストークンを含むページがブラウザや中間プロキシに
//! 残らないよう、`Cache-Control: no-store` を全レスポンスに設定する。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// レスポンスに `Cache-Control: no-store` を付与する
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        middleware::from_fn,
        response::IntoResponse,
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    async fn cached_handler() -> impl IntoResponse {
        ([(header::CACHE_CONTROL, "max-age=3600")], "cached")
    }

    #[tokio::test]
    async fn test_no_cache_レスポンスにno_storeが付く() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn(no_cache));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_no_cache_ハンドラの指定を上書きする() {
        let app = Router::new()
            .route("/", get(cached_handler))
            .layer(from_fn(no_cache));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let values: Vec<_> = response
            .headers()
            .get_all(header::CACHE_CONTROL)
            .iter()
            .collect();
        assert_eq!(values, vec!["no-store"]);
    }
}
