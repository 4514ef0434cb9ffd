//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("列 {column} がシートに存在しません（{side}, 列数={width}）")]
    MissingColumn {
        side: String,
        column: String,
        width: usize,
    },

    #[error("設定値が不正: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
