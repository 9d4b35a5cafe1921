use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },
    #[error("invalid format in {context}: {message}")]
    InvalidFormat { context: String, message: String },
    #[error("empty input: {context}")]
    EmptyInput { context: &'static str },
    #[error("{tool} failed: {message}")]
    ToolFailure { tool: String, message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Coarse classification used by callers that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidFormat,
    EmptyInput,
    ToolFailure,
    Io,
    InvalidArgument,
}

impl AlignmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidFormat { .. } | Self::Json { .. } => ErrorKind::InvalidFormat,
            Self::EmptyInput { .. } => ErrorKind::EmptyInput,
            Self::ToolFailure { .. } => ErrorKind::ToolFailure,
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn not_found(what: &'static str, path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            what,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub(crate) fn invalid_format(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            context: context.into(),
            message: message.into(),
        }
    }

    pub(crate) fn empty_input(context: &'static str) -> Self {
        Self::EmptyInput { context }
    }

    pub(crate) fn tool_failure(tool: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::ToolFailure {
            tool: tool.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
