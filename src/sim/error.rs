use thiserror::Error;

/// Problems with level data, caught once at load time
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        actual: usize,
        expected: usize,
    },
    #[error("declared size {declared_width}x{declared_height} does not match grid {width}x{height}")]
    SizeMismatch {
        declared_width: usize,
        declared_height: usize,
        width: usize,
        height: usize,
    },
    #[error("unknown tile code {0:?}")]
    UnknownTile(String),
    #[error("no level {0} in this level set")]
    NoSuchLevel(u32),
    #[error("malformed level json: {0}")]
    Json(#[from] serde_json::Error),
}
