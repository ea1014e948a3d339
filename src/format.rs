use std::path::Path;

/// Closed set of format families the fingerprinting engine understands.
///
/// Each family carries its own channel eligibility and metadata field name,
/// so adding a format is a localized, exhaustively-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatFamily {
    /// Office Open XML package formats (docx, xlsx, pptx)
    Document,
    Pdf,
    /// QuickTime-style media containers (mov)
    Media,
    #[default]
    Generic,
}

impl FormatFamily {
    /// Classify a file extension (without the dot, case-insensitive).
    /// Total: anything unrecognized falls back to `Generic`.
    pub fn classify(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "docx" | "xlsx" | "pptx" => Self::Document,
            "pdf" => Self::Pdf,
            "mov" => Self::Media,
            _ => Self::Generic,
        }
    }

    /// Classify by path; files without an extension are `Generic`.
    pub fn classify_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::classify)
            .unwrap_or_default()
    }

    /// Metadata field written during embedding and read during detection.
    pub fn metadata_field(&self) -> &'static str {
        match self {
            Self::Document => "Creator",
            Self::Pdf => "Producer",
            Self::Media => "Software",
            Self::Generic => "Title",
        }
    }

    /// Appending bytes to a zip-based container corrupts the archive's
    /// central directory, so Document packages never get the binary channel.
    pub fn supports_binary_append(&self) -> bool {
        !matches!(self, Self::Document)
    }

    pub fn supports_watermark(&self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// Container formats route metadata writes through the package repacker.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Document)
    }
}
