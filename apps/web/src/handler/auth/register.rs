//! ユーザー登録ハンドラ

use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use passhield_domain::{REDACTED, account::Username, password::PlainPassword};
use passhield_infra::repository::InsertOutcome;
use passhield_shared::{
    event_log::{error, event},
    log_business_event,
};

use super::{AuthState, CredentialsForm, run_hasher};
use crate::{error::PageError, view};

/// 登録完了後のリダイレクト先
const REGISTERED_LOCATION: &str = "/login?success=registered";

/// GET /register
#[tracing::instrument(skip_all)]
pub async fn register_page() -> Result<Html<String>, PageError> {
    Ok(Html(view::register_page()?))
}

/// POST /register
///
/// ユーザー名とパスワードを登録し、ログインページへリダイレクトする。
///
/// 1. ユーザー名とパスワードを検証（不正なら 400）
/// 2. ランダムなソルトと秘密鍵付き Argon2id でハッシュ化
/// 3. 認証情報を保存（ユーザー名が重複していれば 409）
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect, PageError> {
    let validated = Username::new(form.username).and_then(|username| {
        PlainPassword::for_registration(form.password).map(|password| (username, password))
    });
    let (username, password) = match validated {
        Ok(pair) => pair,
        Err(e) => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::REGISTRATION_FAILURE,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = REDACTED,
                event.result = event::result::FAILURE,
                event.reason = event::reason::INVALID_INPUT,
                "登録失敗: 入力不正"
            );
            return Err(PageError::InvalidRegistration(e.reason().to_string()));
        }
    };

    let password_hash = run_hasher(&state, move |hasher| hasher.hash(&password))
        .await
        .map_err(|e| {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::PASSWORD_HASH,
                "パスワードのハッシュ化に失敗: {}",
                e
            );
            PageError::Internal
        })?;

    let outcome = state
        .credential_repository
        .insert(&username, &password_hash)
        .await
        .map_err(|e| {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::DATABASE,
                "認証情報の保存に失敗: {}",
                e
            );
            PageError::Internal
        })?;

    match outcome {
        InsertOutcome::Created => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::REGISTERED,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = %username,
                event.result = event::result::SUCCESS,
                "ユーザー登録"
            );
            Ok(Redirect::to(REGISTERED_LOCATION))
        }
        InsertOutcome::AlreadyExists => {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::REGISTRATION_FAILURE,
                event.entity_type = event::entity_type::ACCOUNT,
                event.entity_id = %username,
                event.result = event::result::FAILURE,
                event.reason = event::reason::USERNAME_TAKEN,
                "登録失敗: ユーザー名重複"
            );
            Err(PageError::UsernameTaken)
        }
    }
}
