use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "起動設定ファイルが見つかりません。検索場所:\n\
        - 環境変数 SKYLAUNCH_CONFIG\n\
        - カレントディレクトリ: skylaunch.json, .skylaunch.json\n\
        - ~/.config/skylaunch/skylaunch.json\n\
        ヒント: `skylaunch init` で作成できます"
    )]
    ConfigFileNotFound,

    #[error("必須フィールドがありません: {0}")]
    MissingField(&'static str),

    #[error("無効な値: {field}\n理由: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("SSH公開鍵の読み込みエラー: {}\n理由: {source}", path.display())]
    SshKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("設定ファイルのパースエラー: {}\n理由: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
