//! ログインページ・ログインハンドラ

use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::CookieJar;
use passhield_domain::{
    REDACTED,
    access_token::AccessToken,
    account::Username,
    login_attempt::AttemptStatus,
    password::PlainPassword,
};
use passhield_infra::SessionData;
use passhield_shared::{
    event_log::{error, event},
    log_business_event,
};
use serde::Deserialize;

use super::{AuthState, CredentialsForm, build_session_cookie, run_hasher};
use crate::{
    error::PageError,
    view::{self, LoginNotice},
};

/// `GET /login` のクエリ
#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub success: Option<String>,
}

/// GET /login
///
/// ログインフォームを表示する。`success` クエリに応じてお知らせを出す。
#[tracing::instrument(skip_all)]
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Result<Html<String>, PageError> {
    let notice = LoginNotice::from_query(query.success.as_deref());
    Ok(Html(view::login_page(notice)?))
}

/// POST /login
///
/// ユーザー名/パスワードでログインし、アクセストークンを発行する。
///
/// ## 認証フロー
///
/// 1. ユーザー名を検証（不正なら 400）
/// 2. 試行回数を 1 消費（上限超過なら 429、パスワードは検証しない）
/// 3. 認証情報を取得（未登録なら 404）
/// 4. パスワードを検証（不一致なら 401）
/// 5. 試行回数をリセットし、トークン発行・セッション作成・Cookie 設定
///
/// ## タイミング攻撃対策
///
/// ユーザーが存在しない場合もダミーのハッシュ検証を行い、処理時間を均一化する。
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(CookieJar, Html<String>), PageError> {
    let username = match Username::new(form.username) {
        Ok(username) => username,
        Err(e) => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::LOGIN_FAILURE,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = REDACTED,
                event.result = event::result::FAILURE,
                event.reason = event::reason::INVALID_INPUT,
                "ログイン失敗: 入力不正"
            );
            return Err(PageError::InvalidLoginInput(e.reason().to_string()));
        }
    };
    let password = PlainPassword::new(form.password);

    // Step 1: 試行回数を消費
    match state.login_attempt_limiter.consume(&username).await {
        Ok(AttemptStatus::Allowed { remaining }) => {
            tracing::debug!(remaining, "ログイン試行を許可");
        }
        Ok(AttemptStatus::Locked) => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::LOGIN_FAILURE,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = %username,
                event.result = event::result::FAILURE,
                event.reason = event::reason::TOO_MANY_ATTEMPTS,
                "ログイン失敗: 試行回数超過"
            );
            return Err(PageError::TooManyAttempts);
        }
        Err(e) => {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::LOGIN_ATTEMPTS,
                "試行回数の記録に失敗: {}",
                e
            );
            return Err(PageError::Internal);
        }
    }

    // Step 2: 認証情報を取得
    let credential = match state.credential_repository.find_by_username(&username).await {
        Ok(Some(credential)) => credential,
        Ok(None) => {
            let dummy = run_hasher(&state, move |hasher| {
                hasher.verify_dummy(&password);
                Ok(())
            })
            .await;
            if let Err(e) = dummy {
                tracing::warn!("ダミー検証に失敗（無視）: {}", e);
            }

            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::LOGIN_FAILURE,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = REDACTED,
                event.result = event::result::FAILURE,
                event.reason = event::reason::ACCOUNT_NOT_FOUND,
                "ログイン失敗: ユーザー不存在"
            );
            return Err(PageError::AccountNotFound);
        }
        Err(e) => {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::DATABASE,
                "認証情報の取得に失敗: {}",
                e
            );
            return Err(PageError::Internal);
        }
    };

    // Step 3: パスワードを検証
    let stored_hash = credential.password_hash;
    let verified = run_hasher(&state, move |hasher| hasher.verify(&password, &stored_hash)).await;
    match verified {
        Ok(result) if result.is_match() => {}
        Ok(_) => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::LOGIN_FAILURE,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = %username,
                event.result = event::result::FAILURE,
                event.reason = event::reason::PASSWORD_MISMATCH,
                "ログイン失敗: パスワード不一致"
            );
            return Err(PageError::PasswordMismatch);
        }
        Err(e) => {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::PASSWORD_HASH,
                "パスワード検証で内部エラー: {}",
                e
            );
            return Err(PageError::Internal);
        }
    }

    // Step 4: 試行回数をリセット（失敗してもログインは継続）
    if let Err(e) = state.login_attempt_limiter.reset(&username).await {
        tracing::warn!("試行回数のリセットに失敗（無視）: {}", e);
    }

    // Step 5: トークンを発行
    let token = AccessToken::generate();
    if let Err(e) = state.token_repository.replace(&username, &token).await {
        tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::DATABASE,
            "トークンの保存に失敗: {}",
            e
        );
        return Err(PageError::Internal);
    }

    // Step 6: セッションを作成
    let session_id = match state
        .session_manager
        .create(&SessionData::new(username.clone()))
        .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::SESSION,
                "セッション作成に失敗: {}",
                e
            );
            return Err(PageError::Internal);
        }
    };

    let html = view::token_page(&username, &token)?;
    let jar = jar.add(build_session_cookie(&session_id, state.secure_cookie));

    log_business_event!(
        event.category = event::category::AUTH,
        event.action = event::action::LOGIN_SUCCESS,
        event.entity_type = event::entity_type::SESSION,
        event.entity_id = %session_id,
        event.actor_id = %username,
        event.result = event::result::SUCCESS,
        "ログイン成功"
    );

    Ok((jar, Html(html)))
}
