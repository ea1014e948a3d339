use crate::error::{Result, TracemarkError};
use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One recipient's fingerprinting outcome. Created when the fingerprinted
/// copy is produced, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    pub name: String,
    pub contact: String,
    pub signature: Signature,
    /// SHA-256 of the fully fingerprinted file, computed after all channels.
    pub result_hash: String,
    pub result_path: PathBuf,
}

/// Append-only record set for one campaign, one JSON object per line.
///
/// Self-describing records keep the five-field schema safe against embedded
/// delimiters (a comma in a recipient name cannot shift fields).
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line write.
    pub fn append(&self, record: &RecipientRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        file.write_all(&line)?;
        Ok(())
    }

    /// Load every record in append order. A malformed line is a hard error,
    /// not a skip: the store is the single source of truth for detection.
    pub fn load_all(&self) -> Result<Vec<RecipientRecord>> {
        if !self.path.exists() {
            return Err(TracemarkError::MissingFile(self.path.clone()));
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RecipientRecord = serde_json::from_str(&line).map_err(|e| {
                TracemarkError::InvalidRecord(format!("line {}: {}", i + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}
