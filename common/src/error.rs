//! エラー型定義

use crate::table::FileRole;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 必須列が存在しない（どのファイルのどの列かを保持）
    #[error("⚠️ {role} חייב לכלול עמודת '{column}'")]
    MissingColumn { column: String, role: FileRole },

    /// 行数ゼロ（入場率が計算できない）
    #[error("אין נתונים לניתוח: {0}")]
    EmptyInput(String),

    /// 集計結果の整合性違反
    #[error("Inconsistent summary: {0}")]
    Inconsistent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
