//! # ログイン試行回数の制限
//!
//! アカウントごとにログイン試行回数を数え、一定期間内の上限を超えたら
//! ロックする。カウンタの保存先（Redis）はインフラ層が担当し、
//! ここでは「何回目の試行なら許可するか」だけを決める。
//!
//! ```
//! use passhield_domain::login_attempt::{AttemptStatus, LoginAttemptPolicy};
//!
//! let policy = LoginAttemptPolicy::default();
//! assert_eq!(policy.evaluate(1), AttemptStatus::Allowed { remaining: 2 });
//! assert_eq!(policy.evaluate(4), AttemptStatus::Locked);
//! ```

use std::time::Duration;

/// デフォルトの最大試行回数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// デフォルトのウィンドウ（24 時間）
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// ログイン試行の制限ポリシー
///
/// ウィンドウは最初の試行から数える（固定ウィンドウ）。
/// ウィンドウが経過するとカウンタは破棄され、試行回数は元に戻る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginAttemptPolicy {
    max_attempts: u32,
    window:       Duration,
}

impl LoginAttemptPolicy {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// ウィンドウ内で `count` 回目の試行を評価する
    ///
    /// `count` は今回の試行を含めた回数（1 始まり）。
    pub fn evaluate(&self, count: u64) -> AttemptStatus {
        let max = u64::from(self.max_attempts);
        if count <= max {
            AttemptStatus::Allowed {
                remaining: (max - count) as u32,
            }
        } else {
            AttemptStatus::Locked
        }
    }
}

impl Default for LoginAttemptPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW)
    }
}

/// 試行の評価結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// 試行を許可する。`remaining` は今回を除いた残り回数
    Allowed { remaining: u32 },
    /// 上限に達しておりロック中
    Locked,
}

impl AttemptStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}
