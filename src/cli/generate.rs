use crate::embed::{apply_signature, EmbedOptions};
use crate::error::{Result, TracemarkError};
use crate::hash::sha256_hex;
use crate::metadata::MetadataEditor;
use crate::project::Project;
use crate::signature::Signature;
use crate::store::RecipientRecord;
use crate::targets::read_targets;
use std::fs;
use std::path::Path;

/// Produce one fingerprinted copy of the base file per target and record
/// each copy in the project's fingerprint store.
///
/// Recipients are processed strictly one at a time; any failure aborts the
/// whole run. Returns the records in the order they were appended.
pub fn generate_campaign(
    project: &Project,
    base_file: &Path,
    targets_path: &Path,
    options: &EmbedOptions,
    editor: &dyn MetadataEditor,
) -> Result<Vec<RecipientRecord>> {
    if !base_file.exists() {
        return Err(TracemarkError::MissingFile(base_file.to_path_buf()));
    }
    let file_name = base_file
        .file_name()
        .ok_or_else(|| TracemarkError::MissingFile(base_file.to_path_buf()))?;

    // Validate the target list before touching the filesystem
    let targets = read_targets(targets_path)?;

    project.create()?;
    let store = project.store();

    let mut records = Vec::with_capacity(targets.len());
    for target in targets {
        let signature = Signature::generate();
        let recipient_dir = project.recipient_dir(&target.name);
        // create_dir, not create_dir_all: a pre-existing directory means two
        // targets map to the same name and the copies would overwrite each other
        fs::create_dir(&recipient_dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                TracemarkError::DuplicateRecipient(target.name.clone())
            } else {
                TracemarkError::Io(e)
            }
        })?;

        let copy_path = recipient_dir.join(file_name);
        fs::copy(base_file, &copy_path)?;
        apply_signature(&copy_path, &signature, options, editor)?;

        let record = RecipientRecord {
            name: target.name,
            contact: target.contact,
            signature,
            result_hash: sha256_hex(&copy_path)?,
            result_path: copy_path,
        };
        store.append(&record)?;
        records.push(record);
    }
    Ok(records)
}
