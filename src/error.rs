//! Unified extraction error type surfaced at the crate boundary.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::builder::IncompleteMetadata;
use crate::parse::ParseError;
use crate::tree::SettingsError;

pub type Result<T> = std::result::Result<T, WorkflowalizerError>;

/// Broad category of a [`WorkflowalizerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed in an unusable extraction configuration.
    Configuration,
    /// Unknown format version, node type or template type.
    Unsupported,
    /// A required file or field is missing or has the wrong shape.
    Malformed,
    /// Unsafe XML constructs were found in a file.
    Security,
    /// Filesystem or archive access failed.
    Access,
    /// A staging builder was finalized with an unset field.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "Configuration"),
            ErrorKind::Unsupported => write!(f, "Unsupported"),
            ErrorKind::Malformed => write!(f, "Malformed"),
            ErrorKind::Security => write!(f, "Security"),
            ErrorKind::Access => write!(f, "Access"),
            ErrorKind::Internal => write!(f, "Internal"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WorkflowalizerError {
    #[error("Invalid extraction configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid node exclusion pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Unsupported workflow format version '{0}'")]
    UnsupportedVersion(String),

    #[error("Node '{node_id}' has unknown node type '{node_type}'")]
    UnknownNodeType { node_id: String, node_type: String },

    #[error("Unknown template type '{0}'")]
    UnknownTemplateType(String),

    #[error("Required file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid settings in '{}': {source}", .file.display())]
    Settings {
        file: PathBuf,
        #[source]
        source: SettingsError,
    },

    #[error("Malformed XML in '{}': {message}", .file.display())]
    MalformedXml { file: PathBuf, message: String },

    #[error("Malformed JSON in '{}': {source}", .file.display())]
    MalformedJson {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Connection {source_id}:{source_port} -> {dest_id}:{dest_port} in '{}' references unknown node '{missing}'",
        .file.display()
    )]
    UnresolvedConnection {
        file: PathBuf,
        source_id: i32,
        source_port: i32,
        dest_id: i32,
        dest_port: i32,
        missing: i32,
    },

    #[error("Unsafe XML content (document type declaration) rejected in '{}'", .0.display())]
    UnsafeXml(PathBuf),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error on '{}': {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Invalid archive '{}': {message}", .path.display())]
    InvalidArchive { path: PathBuf, message: String },

    #[error("Internal consistency error: {0}")]
    Incomplete(#[from] IncompleteMetadata),
}

impl WorkflowalizerError {
    /// Stable short code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowalizerError::InvalidConfiguration(_) => "W001",
            WorkflowalizerError::InvalidPattern(_) => "W002",
            WorkflowalizerError::UnsupportedVersion(_) => "W010",
            WorkflowalizerError::UnknownNodeType { .. } => "W011",
            WorkflowalizerError::UnknownTemplateType(_) => "W012",
            WorkflowalizerError::MissingFile(_) => "W020",
            WorkflowalizerError::Settings { .. } => "W021",
            WorkflowalizerError::MalformedXml { .. } => "W022",
            WorkflowalizerError::MalformedJson { .. } => "W023",
            WorkflowalizerError::UnresolvedConnection { .. } => "W024",
            WorkflowalizerError::UnsafeXml(_) => "W030",
            WorkflowalizerError::Io { .. } => "W040",
            WorkflowalizerError::Archive { .. } => "W041",
            WorkflowalizerError::InvalidArchive { .. } => "W042",
            WorkflowalizerError::Incomplete(_) => "W050",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowalizerError::InvalidConfiguration(_)
            | WorkflowalizerError::InvalidPattern(_) => ErrorKind::Configuration,
            WorkflowalizerError::UnsupportedVersion(_)
            | WorkflowalizerError::UnknownNodeType { .. }
            | WorkflowalizerError::UnknownTemplateType(_) => ErrorKind::Unsupported,
            WorkflowalizerError::MissingFile(_)
            | WorkflowalizerError::Settings { .. }
            | WorkflowalizerError::MalformedXml { .. }
            | WorkflowalizerError::MalformedJson { .. }
            | WorkflowalizerError::UnresolvedConnection { .. } => ErrorKind::Malformed,
            WorkflowalizerError::UnsafeXml(_) => ErrorKind::Security,
            WorkflowalizerError::Io { .. }
            | WorkflowalizerError::Archive { .. }
            | WorkflowalizerError::InvalidArchive { .. } => ErrorKind::Access,
            WorkflowalizerError::Incomplete(_) => ErrorKind::Internal,
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        WorkflowalizerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn settings(file: &Path, source: SettingsError) -> Self {
        WorkflowalizerError::Settings {
            file: file.to_path_buf(),
            source,
        }
    }

    /// Attaches the file a parser-strategy failure originated from.
    pub fn parse(file: &Path, error: ParseError) -> Self {
        match error {
            ParseError::Settings(source) => WorkflowalizerError::settings(file, source),
            ParseError::UnknownNodeType { node_id, node_type } => {
                WorkflowalizerError::UnknownNodeType { node_id, node_type }
            }
            ParseError::UnknownTemplateType(raw) => WorkflowalizerError::UnknownTemplateType(raw),
            ParseError::UnresolvedConnection {
                source_id,
                source_port,
                dest_id,
                dest_port,
                missing,
            } => WorkflowalizerError::UnresolvedConnection {
                file: file.to_path_buf(),
                source_id,
                source_port,
                dest_id,
                dest_port,
                missing,
            },
        }
    }
}

/// Extension for attaching a file path to strategy results.
pub(crate) trait ParseResultExt<T> {
    fn in_file(self, file: &Path) -> Result<T>;
}

impl<T, E: Into<ParseError>> ParseResultExt<T> for std::result::Result<T, E> {
    fn in_file(self, file: &Path) -> Result<T> {
        self.map_err(|e| WorkflowalizerError::parse(file, e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_kinds_line_up() {
        let err = WorkflowalizerError::UnsupportedVersion("9.9.9".into());
        assert_eq!(err.code(), "W010");
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(
            err.to_string(),
            "Unsupported workflow format version '9.9.9'"
        );
    }

    #[test]
    fn parse_errors_keep_their_category() {
        let err = WorkflowalizerError::parse(
            Path::new("workflow.knime"),
            ParseError::UnknownNodeType {
                node_id: "4".into(),
                node_type: "Bogus".into(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let err = WorkflowalizerError::parse(
            Path::new("workflow.knime"),
            ParseError::Settings(SettingsError::MissingKey {
                config: "node_1".into(),
                key: "id".into(),
            }),
        );
        assert_eq!(err.code(), "W021");
        assert!(err.to_string().contains("workflow.knime"));
    }
}
