use crate::error::{Result, TracemarkError};
use crate::store::FingerprintStore;
use std::path::PathBuf;

/// On-disk campaign layout, anchored at an explicit root directory:
///
/// ```text
/// <root>/<name>/db.jsonl          fingerprint store
/// <root>/<name>/files/<Recipient>/<base file>
/// ```
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    name: String,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir().join("db.jsonl")
    }

    pub fn files_dir(&self) -> PathBuf {
        self.dir().join("files")
    }

    pub fn store(&self) -> FingerprintStore {
        FingerprintStore::new(self.store_path())
    }

    /// Create the project skeleton. One store per campaign: an existing
    /// directory means the campaign was already generated.
    pub fn create(&self) -> Result<()> {
        if self.dir().exists() {
            return Err(TracemarkError::ProjectExists(self.name.clone()));
        }
        std::fs::create_dir_all(self.files_dir())?;
        Ok(())
    }

    /// Per-recipient directory; spaces in names become underscores so the
    /// path stays shell-friendly.
    pub fn recipient_dir(&self, recipient: &str) -> PathBuf {
        self.files_dir().join(recipient.replace(' ', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_paths() {
        let project = Project::new("/campaigns", "q3-board-deck");
        assert_eq!(project.dir(), PathBuf::from("/campaigns/q3-board-deck"));
        assert_eq!(
            project.store_path(),
            PathBuf::from("/campaigns/q3-board-deck/db.jsonl")
        );
        assert_eq!(
            project.recipient_dir("Ada Lovelace"),
            PathBuf::from("/campaigns/q3-board-deck/files/Ada_Lovelace")
        );
    }

    #[test]
    fn test_create_then_exists() {
        let dir = tempdir().unwrap();
        let project = Project::new(dir.path(), "camp");
        project.create().unwrap();
        assert!(project.files_dir().is_dir());

        assert!(matches!(
            project.create(),
            Err(TracemarkError::ProjectExists(_))
        ));
    }
}
