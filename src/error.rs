//! Error types.

/// Errors raised while reading or writing a `GameConfig`.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Errors raised by a best-score store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt save record: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Top-level error returned by the binary.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("score store failed: {0}")]
    Store(#[from] StoreError),
}
