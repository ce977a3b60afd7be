//! # アプリケーション構築
//!
//! State を受け取ってルーターを組み立てる。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, middleware::from_fn, routing::get};
use passhield_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use passhield_web::{
    error::not_found_fallback,
    handler::{
        AuthState,
        ReadinessState,
        health_check,
        index,
        login,
        login_page,
        logout,
        readiness_check,
        register,
        register_page,
    },
    middleware::no_cache,
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// ルーター定義を行う
pub(crate) fn build_app(auth_state: Arc<AuthState>, readiness_state: Arc<ReadinessState>) -> Router {
    let readiness = Router::new()
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state);

    with_layers(app_routes(auth_state).merge(readiness))
}

/// 外部接続を持たないルート（ページ・認証・Liveness）
fn app_routes(auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        .route("/register", get(register_page).post(register))
        .with_state(auth_state)
        .fallback(not_found_fallback)
}

/// 全ルート共通のレイヤー
fn with_layers(router: Router) -> Router {
    router
        .layer(from_fn(no_cache))
        // 下に書いたものが外側
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id を含める
        // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use passhield_domain::{
        access_token::AccessToken,
        account::Username,
        login_attempt::AttemptStatus,
        password::{PasswordHash, PasswordVerifyResult, PlainPassword},
    };
    use passhield_infra::{
        InfraError,
        LoginAttemptLimiter,
        PasswordHasher,
        SessionData,
        SessionManager,
        repository::{Credential, CredentialRepository, InsertOutcome, TokenRepository},
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;

    /// 削除されたセッション ID だけを記録するストア
    #[derive(Default)]
    struct RecordingSessions {
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SessionManager for RecordingSessions {
        async fn create(&self, _data: &SessionData) -> Result<String, InfraError> {
            Ok("session".to_string())
        }

        async fn get(&self, _session_id: &str) -> Result<Option<SessionData>, InfraError> {
            Ok(None)
        }

        async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
            self.deleted.lock().unwrap().push(session_id.to_string());
            Ok(())
        }
    }

    /// 認証系の依存は呼ばれない前提のスタブ
    struct Unused;

    #[async_trait]
    impl LoginAttemptLimiter for Unused {
        async fn consume(&self, _username: &Username) -> Result<AttemptStatus, InfraError> {
            Err(InfraError::unexpected("unused"))
        }

        async fn reset(&self, _username: &Username) -> Result<(), InfraError> {
            Err(InfraError::unexpected("unused"))
        }
    }

    #[async_trait]
    impl CredentialRepository for Unused {
        async fn find_by_username(
            &self,
            _username: &Username,
        ) -> Result<Option<Credential>, InfraError> {
            Err(InfraError::unexpected("unused"))
        }

        async fn insert(
            &self,
            _username: &Username,
            _password_hash: &PasswordHash,
        ) -> Result<InsertOutcome, InfraError> {
            Err(InfraError::unexpected("unused"))
        }
    }

    #[async_trait]
    impl TokenRepository for Unused {
        async fn replace(&self, _username: &Username, _token: &AccessToken) -> Result<(), InfraError> {
            Err(InfraError::unexpected("unused"))
        }
    }

    impl PasswordHasher for Unused {
        fn hash(&self, _password: &PlainPassword) -> Result<PasswordHash, InfraError> {
            Err(InfraError::unexpected("unused"))
        }

        fn verify(
            &self,
            _password: &PlainPassword,
            _hash: &PasswordHash,
        ) -> Result<PasswordVerifyResult, InfraError> {
            Err(InfraError::unexpected("unused"))
        }

        fn verify_dummy(&self, _password: &PlainPassword) {}
    }

    fn sut(sessions: Arc<RecordingSessions>) -> Router {
        let auth_state = Arc::new(AuthState {
            session_manager:       sessions,
            login_attempt_limiter: Arc::new(Unused),
            credential_repository: Arc::new(Unused),
            token_repository:      Arc::new(Unused),
            password_hasher:       Arc::new(Unused),
            secure_cookie:         false,
        });
        with_layers(app_routes(auth_state))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[rstest]
    #[case("/", "/login")]
    #[case("/logout", "/login?success=logged-out")]
    #[tokio::test]
    async fn test_リダイレクトするルートに共通ヘッダーが付く(
        #[case] uri: &str,
        #[case] location: &str,
    ) {
        let app = sut(Arc::new(RecordingSessions::default()));

        let response = app.oneshot(get_request(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], location);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_logoutはセッションストアまで届く() {
        let sessions = Arc::new(RecordingSessions::default());
        let app = sut(Arc::clone(&sessions));
        let request = Request::builder()
            .uri("/logout")
            .header(header::COOKIE, "session_id=abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(*sessions.deleted.lock().unwrap(), vec!["abc-123".to_string()]);
    }

    #[tokio::test]
    async fn test_クライアント指定のrequest_idがそのまま返る() {
        let app = sut(Arc::new(RecordingSessions::default()));
        let request = Request::builder()
            .uri("/")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_未定義のパスはjsonの404() {
        let app = sut(Arc::new(RecordingSessions::default()));

        let response = app.oneshot(get_request("/no-such-page")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
    }

    #[tokio::test]
    async fn test_livenessは200() {
        let app = sut(Arc::new(RecordingSessions::default()));

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
