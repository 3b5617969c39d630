use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure kinds. Every variant ends the run with a one-line message
/// and a non-zero exit; soft outcomes (sibling not found, tolerant tool
/// failures) are modeled as `Option::None` instead.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Stage configuration missing.")]
    ConfigMissing,

    #[error("Incorrect stage attributes format: {0}")]
    ConfigMalformed(String),

    #[error("Incorrect stage attributes format: missing or empty '{0}' field.")]
    ConfigIncomplete(&'static str),

    #[error("Cannot open '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse '{path}': {detail}")]
    FileParse { path: PathBuf, detail: String },

    #[error(
        "Missing dependency: the {0} executable needs to be installed and in a system path."
    )]
    ToolMissing(String),

    #[error("Error running {program} command: {stderr}")]
    ToolFailed { program: String, stderr: String },
}
