use crate::error::{Result, TracemarkError};
use std::path::Path;

/// One line of the target list: who receives a fingerprinted copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub contact: String,
}

/// Read the recipient list: one `name,contact` pair per line, exactly one
/// comma. Blank lines are skipped; anything else malformed is fatal.
pub fn read_targets(path: &Path) -> Result<Vec<Target>> {
    if !path.exists() {
        return Err(TracemarkError::MissingFile(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let mut targets = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, contact) = line
            .split_once(',')
            .ok_or_else(|| TracemarkError::MalformedTarget(line.to_string()))?;
        if contact.contains(',') {
            return Err(TracemarkError::MalformedTarget(line.to_string()));
        }
        targets.push(Target {
            name: name.trim().to_string(),
            contact: contact.trim().to_string(),
        });
    }
    Ok(targets)
}
