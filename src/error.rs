use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TracemarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Wrong target format: {0}. Expected exactly one comma, e.g. \"Ada Lovelace,ada@example.com\"")]
    MalformedTarget(String),

    #[error("Recipient {0} collides with an earlier target: each target needs a distinct directory name")]
    DuplicateRecipient(String),

    #[error("Project {0} already exists")]
    ProjectExists(String),

    #[error("Document {} has no core.xml metadata section. This usually happens with documents authored outside Microsoft Office (e.g. Google Docs)", .0.display())]
    MissingMetadataSection(PathBuf),

    #[error("{tool} failed: {detail}")]
    ExternalTool { tool: String, detail: String },

    #[error("{tool} did not finish within {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("Invalid store record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, TracemarkError>;
