use thiserror::Error;
use tinyboard_core::LayoutId;
use tinyboard_layout::LayoutError;

pub type Result<T> = std::result::Result<T, BoardError>;

/// Misuse of the board API.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("layout id {id} is already on the board")]
    DuplicateId { id: LayoutId },

    #[error("no layout item with id {id}")]
    UnknownItem { id: LayoutId },

    #[error("board is readonly")]
    Readonly,

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("invalid board configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Failure to load or validate a [`BoardConfig`](crate::BoardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-files")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
}
