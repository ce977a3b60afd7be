//! ログアウトハンドラ

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use passhield_shared::{event_log::event, log_business_event};

use super::{AuthState, SESSION_COOKIE_NAME, build_clear_cookie};

/// ログアウト後のリダイレクト先
const LOGGED_OUT_LOCATION: &str = "/login?success=logged-out";

/// GET /logout
///
/// セッションからユーザー名を取り除き、ログインページへリダイレクトする（302 Found）。
///
/// - サーバー側のセッションを削除し、`session_id` Cookie をクリアする
/// - ログインしていなくても同じ応答を返す
/// - セッションストアのエラーは警告ログのみで、応答は変えない
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<Arc<AuthState>>, jar: CookieJar) -> impl IntoResponse {
    let mut actor = None;

    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        let session_id = cookie.value();

        match state.session_manager.get(session_id).await {
            Ok(session) => actor = session.map(|data| data.username().clone()),
            Err(e) => tracing::warn!("セッション取得に失敗（無視）: {}", e),
        }

        if let Err(e) = state.session_manager.delete(session_id).await {
            tracing::warn!("セッション削除に失敗（無視）: {}", e);
        }
    }

    match &actor {
        Some(username) => log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGOUT,
            event.entity_type = event::entity_type::SESSION,
            event.actor_id = %username,
            event.result = event::result::SUCCESS,
            "ログアウト"
        ),
        None => log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGOUT,
            event.entity_type = event::entity_type::SESSION,
            event.result = event::result::SUCCESS,
            "ログアウト（セッションなし）"
        ),
    }

    (
        StatusCode::FOUND,
        jar.add(build_clear_cookie(state.secure_cookie)),
        [(header::LOCATION, LOGGED_OUT_LOCATION)],
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use pretty_assertions::assert_eq;

    use super::super::test_utils::*;

    fn logout_request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/logout");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_logout_セッションが削除されてcookieがクリアされる() {
        // Given
        let deps = TestDeps::new();

        // When
        let response = send(deps.app(), logout_request(Some("session_id=abc-123"))).await;

        // Then
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?success=logged-out"
        );

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("session_id="));
        assert!(cookie.contains("Max-Age=0"));

        assert_eq!(
            *deps.session_manager.deleted.lock().unwrap(),
            vec!["abc-123".to_string()]
        );
    }

    #[tokio::test]
    async fn test_logout_未ログインでも同じリダイレクトを返す() {
        let deps = TestDeps::new();

        let response = send(deps.app(), logout_request(None)).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?success=logged-out"
        );
        assert!(
            response.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
        assert!(deps.session_manager.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_セッションストアのエラーでも応答は変わらない() {
        let deps = TestDeps::new().with_session_manager(StubSessionManager::failing());

        let response = send(deps.app(), logout_request(Some("session_id=abc-123"))).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?success=logged-out"
        );
        assert!(
            response.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
    }

    #[tokio::test]
    async fn test_logout_ログイン後のログアウトでセッションが消える() {
        // Given
        let deps = TestDeps::new()
            .with_credentials(StubCredentialRepository::with_account("alice", "password123"));
        send(
            deps.app(),
            form_request("/login", "username=alice&password=password123"),
        )
        .await;

        // When
        let cookie = format!("session_id={STUB_SESSION_ID}");
        let response = send(deps.app(), logout_request(Some(&cookie))).await;

        // Then
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            *deps.session_manager.looked_up.lock().unwrap(),
            vec![STUB_SESSION_ID.to_string()]
        );
        assert_eq!(
            *deps.session_manager.deleted.lock().unwrap(),
            vec![STUB_SESSION_ID.to_string()]
        );
    }
}
