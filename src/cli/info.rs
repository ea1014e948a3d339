use crate::error::Result;
use crate::project::Project;

/// Summarize a project's fingerprint store.
pub fn show_info(project: &Project) -> Result<String> {
    let records = project.store().load_all()?;

    let mut output = String::new();
    output.push_str(&format!("Project: {}\n", project.name()));
    output.push_str(&format!("Store: {}\n", project.store_path().display()));
    output.push_str(&format!("Recipients: {}\n\n", records.len()));

    for record in &records {
        output.push_str(&format!("{} <{}>\n", record.name, record.contact));
        output.push_str(&format!("  Signature: {}\n", record.signature));
        output.push_str(&format!("  SHA-256: {}\n", record.result_hash));
        output.push_str(&format!("  File: {}\n", record.result_path.display()));
    }
    Ok(output)
}
