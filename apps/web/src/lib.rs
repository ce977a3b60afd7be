//! # PassShield Web ライブラリ
//!
//! パスワード登録・ログイン・ログアウトを提供する Web サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `error`: ハンドラのエラーと HTML エラーページへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（キャッシュ制御）
//! - `view`: HTML ページの描画（tera テンプレート）

pub mod error;
pub mod handler;
pub mod middleware;
pub mod view;
