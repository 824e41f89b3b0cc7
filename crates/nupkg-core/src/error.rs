use std::path::PathBuf;

/// Errors produced by core `nupkg` operations.
#[derive(Debug, thiserror::Error)]
pub enum PkgError {
    #[error("failed to read state file {}: {source}", .path.display())]
    StateRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write state file {}: {source}", .path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("could not determine a data directory for nupkg")]
    NoDataDir,

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
