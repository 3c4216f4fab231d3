use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("app directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("create sso group {group} failed: {reason}")]
    GroupCreateFailed { group: String, reason: String },

    #[error("failed to read {key}: {reason}")]
    ConfigReadFailed { key: String, reason: String },

    #[error("failed to update {key}: {reason}")]
    ConfigWriteFailed { key: String, reason: String },

    #[error("restart {container} failed: {reason}, please try again or restart it manually")]
    RestartFailed { container: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
