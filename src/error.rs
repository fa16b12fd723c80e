use std::io;
use std::path::PathBuf;

/// Coarse classification of a failed launch, for callers that branch on the
/// kind of failure rather than on its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    NotFound,
    PermissionDenied,
    SpawnFailed,
}

/// Errors produced while turning user text into a [`ResolvedTarget`](crate::ResolvedTarget).
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The input had no command in it.
    #[error("Please enter a command")]
    EmptyInput,

    /// A bare name did not match any search path entry.
    #[error("'{command}' is not recognized as a command or program")]
    CommandNotFound { command: String },

    /// An explicit path did not exist, neither verbatim nor with any known extension.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A candidate existed but is not executable.
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::CommandNotFound { .. } | Self::FileNotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
        }
    }
}

/// Errors reported by a [`ProcessSpawner`](crate::ProcessSpawner).
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The executable vanished between resolution and spawn.
    #[error("File not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other rejection by the OS (bad image, resource exhaustion, ...).
    #[error("Failed to spawn process: {source}")]
    Failed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SpawnError {
    /// Classify an OS error raised while starting `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Failed { path, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Failed { .. } => ErrorKind::SpawnFailed,
        }
    }
}

/// Anything that can go wrong between receiving user text and a started process.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

impl LaunchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Resolve(e) => e.kind(),
            Self::Spawn(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds_are_classified() {
        let not_found = SpawnError::from_io("/x", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let denied = SpawnError::from_io("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.kind(), ErrorKind::PermissionDenied);

        let other = SpawnError::from_io("/x", io::Error::other("exec format error"));
        assert_eq!(other.kind(), ErrorKind::SpawnFailed);
        assert_eq!(other.to_string(), "Failed to spawn process: exec format error");
    }

    #[test]
    fn test_launch_error_keeps_inner_message() {
        let err = LaunchError::from(ResolveError::CommandNotFound {
            command: "foobar123".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            "'foobar123' is not recognized as a command or program"
        );
    }
}
