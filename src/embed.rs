use crate::error::Result;
use crate::format::FormatFamily;
use crate::metadata::MetadataEditor;
use crate::repack::{self, CREATOR_ELEMENT};
use crate::signature::Signature;
use crate::watermark;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Which embedding channels to run. All on by default; the format itself
/// still decides eligibility per channel.
#[derive(Debug, Clone, Copy)]
pub struct EmbedOptions {
    pub binary: bool,
    pub metadata: bool,
    pub watermark: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            binary: true,
            metadata: true,
            watermark: true,
        }
    }
}

impl EmbedOptions {
    pub fn any(&self) -> bool {
        self.binary || self.metadata || self.watermark
    }
}

/// Embed a recipient's signature into the file, in place, through every
/// enabled channel the format supports.
///
/// Channel order is fixed: watermark, then metadata, then binary append.
/// The append runs last so the recorded content hash covers all channels.
/// Any failure aborts the run; there is no partial-campaign recovery.
pub fn apply_signature(
    path: &Path,
    signature: &Signature,
    options: &EmbedOptions,
    editor: &dyn MetadataEditor,
) -> Result<()> {
    let family = FormatFamily::classify_path(path);

    if options.watermark && family.supports_watermark() {
        watermark::apply_watermark(path, signature.as_str())?;
    }

    if options.metadata {
        if family.is_container() {
            repack::patch_container_metadata(path, CREATOR_ELEMENT, signature.as_str())?;
        } else {
            editor.write_field(path, family.metadata_field(), signature.as_str())?;
        }
    }

    if options.binary && family.supports_binary_append() {
        append_signature(path, signature)?;
    }

    Ok(())
}

/// Binary-append channel: one space plus the signature token as raw bytes at
/// end-of-file, so the token reads as a contiguous substring near the tail.
pub fn append_signature(path: &Path, signature: &Signature) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(b" ")?;
    file.write_all(signature.as_str().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repack::tests::write_test_docx;
    use crate::watermark::tests::write_test_pdf;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// In-memory metadata collaborator for tests.
    struct FakeEditor {
        fields: RefCell<HashMap<(PathBuf, String), String>>,
    }

    impl FakeEditor {
        fn new() -> Self {
            Self {
                fields: RefCell::new(HashMap::new()),
            }
        }
    }

    impl MetadataEditor for FakeEditor {
        fn read_field(&self, path: &Path, field: &str) -> Result<Option<String>> {
            Ok(self
                .fields
                .borrow()
                .get(&(path.to_path_buf(), field.to_string()))
                .cloned())
        }

        fn write_field(&self, path: &Path, field: &str, value: &str) -> Result<()> {
            self.fields
                .borrow_mut()
                .insert((path.to_path_buf(), field.to_string()), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_append_signature_tail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, b"original content").unwrap();

        let sig = Signature::generate();
        append_signature(&path, &sig).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("original content {}", sig));
    }

    #[test]
    fn test_generic_file_gets_metadata_and_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, b"body").unwrap();

        let sig = Signature::generate();
        let editor = FakeEditor::new();
        apply_signature(&path, &sig, &EmbedOptions::default(), &editor).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with(&format!(" {}", sig)));
        // Generic formats carry the Title field
        let title = editor.read_field(&path, "Title").unwrap();
        assert_eq!(title.as_deref(), Some(sig.as_str()));
    }

    #[test]
    fn test_document_package_is_never_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.docx");
        write_test_docx(&path, "Author");
        let before_len = std::fs::metadata(&path).unwrap().len();

        let sig = Signature::generate();
        let editor = FakeEditor::new();
        apply_signature(&path, &sig, &EmbedOptions::default(), &editor).unwrap();

        // Archive still opens and the tail carries no appended token
        let bytes = std::fs::read(&path).unwrap();
        let tail = format!(" {}", sig).into_bytes();
        assert!(!bytes.ends_with(&tail));
        let mut archive =
            zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        assert!(archive.by_name("docProps/core.xml").is_ok());
        // Repack changes the bytes but the file stays a valid archive
        assert_ne!(before_len, 0);
        // Metadata went through the repacker, not the editor
        assert!(editor.fields.borrow().is_empty());
    }

    #[test]
    fn test_pdf_gets_watermark_and_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_test_pdf(&path, "body text");

        let sig = Signature::generate();
        let editor = FakeEditor::new();
        let options = EmbedOptions {
            metadata: false, // pdf metadata goes through the external tool
            ..Default::default()
        };
        apply_signature(&path, &sig, &options, &editor).unwrap();

        let text = crate::watermark::extract_text(&path).unwrap();
        assert!(text.contains(sig.as_str()));
    }

    #[test]
    fn test_disabled_channels_do_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, b"body").unwrap();

        let sig = Signature::generate();
        let editor = FakeEditor::new();
        let options = EmbedOptions {
            binary: false,
            metadata: false,
            watermark: false,
        };
        apply_signature(&path, &sig, &options, &editor).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "body");
        assert!(editor.fields.borrow().is_empty());
    }
}
