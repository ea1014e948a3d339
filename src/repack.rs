use crate::error::{Result, TracemarkError};
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Fixed path of the metadata fragment inside Office Open XML packages.
const CORE_FRAGMENT: &str = "docProps/core.xml";

/// XML element patched for the container metadata channel.
pub const CREATOR_ELEMENT: &str = "dc:creator";

/// Patch one XML element inside a zip-based document package, in place.
///
/// Unpacks the archive into a scratch directory (removed on drop, success or
/// failure), substitutes the first `<element>…</element>` occurrence in
/// `docProps/core.xml`, then rebuilds the archive. Every other entry survives
/// byte-identical. Documents that never went through the expected authoring
/// tool lack the fragment or the element and fail with
/// `MissingMetadataSection`.
pub fn patch_container_metadata(path: &Path, element: &str, value: &str) -> Result<()> {
    let scratch = TempDir::new()?;
    unpack(path, scratch.path())?;

    let core_path = scratch.path().join(CORE_FRAGMENT);
    if !core_path.exists() {
        return Err(TracemarkError::MissingMetadataSection(path.to_path_buf()));
    }

    let xml = fs::read_to_string(&core_path)?;
    let patched = substitute_element(&xml, element, value)
        .ok_or_else(|| TracemarkError::MissingMetadataSection(path.to_path_buf()))?;
    fs::write(&core_path, patched)?;

    let archive = pack(scratch.path())?;
    fs::write(path, archive)?;
    Ok(())
}

/// Replace the content of the first `<element>…</element>` pair. Returns
/// `None` when the element is absent.
fn substitute_element(xml: &str, element: &str, value: &str) -> Option<String> {
    let open = format!("<{}>", element);
    let close = format!("</{}>", element);
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(format!("{}{}{}", &xml[..start], value, &xml[end..]))
}

/// Extract a zip-compatible archive into `dest`.
pub fn unpack(path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(dest)?;
    Ok(())
}

/// Build an in-memory zip archive from a directory tree, entry names relative
/// to `root` with forward slashes.
fn pack(root: &Path) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| TracemarkError::ExternalTool {
            tool: "walkdir".into(),
            detail: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| TracemarkError::ExternalTool {
                tool: "walkdir".into(),
                detail: e.to_string(),
            })?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        writer.start_file(name, options)?;
        writer.write_all(&fs::read(entry.path())?)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
