//! # HTML ページ描画
//!
//! tera テンプレートで HTML ページを生成する。
//!
//! - テンプレートは `include_str!` でバイナリに埋め込む
//! - `.html` テンプレートは tera が自動でエスケープする
//! - 起動時に [`verify_templates`] を呼び、構文エラーを早期に検出する

use std::sync::LazyLock;

use passhield_domain::{
    access_token::AccessToken,
    account::{USERNAME_MAX_LENGTH, Username},
    password::{PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH},
};
use tera::{Context, Tera};
use thiserror::Error;

static TEMPLATES: LazyLock<Result<Tera, tera::Error>> = LazyLock::new(|| {
    let mut engine = Tera::default();
    engine.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("login.html", include_str!("../templates/login.html")),
        ("register.html", include_str!("../templates/register.html")),
        ("message.html", include_str!("../templates/message.html")),
        ("token.html", include_str!("../templates/token.html")),
    ])?;
    Ok(engine)
});

/// テンプレートの読み込み・描画エラー
#[derive(Debug, Clone, Error)]
#[error("テンプレートの描画に失敗しました: {0}")]
pub struct ViewError(String);

impl From<&tera::Error> for ViewError {
    fn from(e: &tera::Error) -> Self {
        // tera のエラーは原因が source チェーンに入っているため連結して保持する
        let mut message = e.to_string();
        let mut source = std::error::Error::source(e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self(message)
    }
}

fn render(template: &str, context: &Context) -> Result<String, ViewError> {
    let engine = TEMPLATES.as_ref().map_err(ViewError::from)?;
    engine
        .render(template, context)
        .map_err(|e| ViewError::from(&e))
}

/// 全テンプレートが読み込めることを確認する
pub fn verify_templates() -> Result<(), ViewError> {
    TEMPLATES.as_ref().map(|_| ()).map_err(ViewError::from)
}

/// ログインページに表示するお知らせ
///
/// `GET /login?success=...` のクエリ値から決まる。
/// 未知の値は無視し、画面には一切反映しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginNotice {
    /// `success=logged-out`
    LoggedOut,
    /// `success=registered`
    Registered,
}

impl LoginNotice {
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value {
            Some("logged-out") => Some(Self::LoggedOut),
            Some("registered") => Some(Self::Registered),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::LoggedOut => "You have been logged out.",
            Self::Registered => "Registration complete. Please log in.",
        }
    }
}

/// ログインページ
pub fn login_page(notice: Option<LoginNotice>) -> Result<String, ViewError> {
    let mut context = Context::new();
    context.insert("notice", &notice.map(|n| n.message()));
    render("login.html", &context)
}

/// 登録ページ
pub fn register_page() -> Result<String, ViewError> {
    let mut context = Context::new();
    context.insert("username_max_length", &USERNAME_MAX_LENGTH);
    context.insert("password_min_length", &PASSWORD_MIN_LENGTH);
    context.insert("password_max_length", &PASSWORD_MAX_LENGTH);
    render("register.html", &context)
}

/// ログイン成功ページ（アクセストークンを表示する）
pub fn token_page(username: &Username, token: &AccessToken) -> Result<String, ViewError> {
    let mut context = Context::new();
    context.insert("username", username.as_str());
    context.insert("token", token.as_str());
    render("token.html", &context)
}

/// 結果通知ページの内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub title:   &'static str,
    pub heading: &'static str,
    pub detail:  Option<String>,
}

/// 結果通知ページ（ログイン失敗・登録失敗・内部エラー）
pub fn message_page(page: &MessagePage) -> Result<String, ViewError> {
    let mut context = Context::new();
    context.insert("title", page.title);
    context.insert("heading", page.heading);
    context.insert("detail", &page.detail);
    render("message.html", &context)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_テンプレートがすべて読み込める() {
        assert!(verify_templates().is_ok());
    }

    #[rstest]
    #[case(Some("logged-out"), Some(LoginNotice::LoggedOut))]
    #[case(Some("registered"), Some(LoginNotice::Registered))]
    #[case(Some("unknown"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn test_クエリ値からお知らせを判定する(
        #[case] value: Option<&str>,
        #[case] expected: Option<LoginNotice>,
    ) {
        assert_eq!(LoginNotice::from_query(value), expected);
    }

    #[rstest]
    fn test_ログインページにお知らせが表示される() {
        let html = login_page(Some(LoginNotice::LoggedOut)).unwrap();

        assert!(html.contains("You have been logged out."));
        assert!(html.contains(r#"action="/login""#));
    }

    #[rstest]
    fn test_お知らせなしのログインページ() {
        let html = login_page(None).unwrap();

        assert!(!html.contains(r#"class="notice""#));
    }

    #[rstest]
    fn test_登録ページに入力制約が埋め込まれる() {
        let html = register_page().unwrap();

        assert!(html.contains(r#"maxlength="50""#));
        assert!(html.contains(r#"minlength="8""#));
        assert!(html.contains(r#"action="/register""#));
    }

    #[rstest]
    fn test_トークンページにユーザー名とトークンが表示される() {
        let username = Username::new("alice").unwrap();
        let token = AccessToken::generate();

        let html = token_page(&username, &token).unwrap();

        assert!(html.contains("Welcome, alice"));
        assert!(html.contains(token.as_str()));
    }

    #[rstest]
    fn test_メッセージページの詳細はエスケープされる() {
        let page = MessagePage {
            title:   "registration failed",
            heading: "Sorry, your registration is failed.",
            detail:  Some("<script>alert(1)</script>".to_string()),
        };

        let html = message_page(&page).unwrap();

        assert!(html.contains("Sorry, your registration is failed."));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
