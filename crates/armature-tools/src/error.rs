//! Tool set setup errors

use armature_dispatch::{RegistryError, ToolError};
use std::path::Path;
use thiserror::Error;

/// Failure while preparing a tool set
#[derive(Debug, Error)]
pub enum SetupError {
    /// A working directory could not be created
    #[error("Failed to prepare directory {path}: {source}")]
    Directory {
        /// Directory that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Two tools share a name
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SetupError {
    pub(crate) fn directory(path: &Path, source: std::io::Error) -> Self {
        SetupError::Directory {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Reject anything but a single plain path component
///
/// Used for caller-supplied file and game names so a request cannot
/// reach outside the tool's directories.
pub(crate) fn single_component(kind: &str, name: &str) -> Result<(), ToolError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', ':', '\0']);
    if bad {
        Err(ToolError::Invalid(format!("Invalid {}: {}", kind, name)))
    } else {
        Ok(())
    }
}
