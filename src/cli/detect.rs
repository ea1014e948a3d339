use crate::detect::{detect, LeakMatch};
use crate::error::Result;
use crate::metadata::MetadataEditor;
use crate::project::Project;
use std::path::Path;

/// Run detection of a suspect file against a project's fingerprint store.
pub fn detect_leak(
    project: &Project,
    suspect: &Path,
    editor: &dyn MetadataEditor,
) -> Result<Vec<LeakMatch>> {
    let records = project.store().load_all()?;
    detect(suspect, &records, editor)
}

/// Render the match report, one line per matched channel per recipient.
pub fn render_matches(matches: &[LeakMatch]) -> String {
    if matches.is_empty() {
        return "No match found.\n".to_string();
    }
    let mut output = String::new();
    for leak in matches {
        if leak.channels.hash {
            output.push_str(&format!("File hash matched: {}\n", leak.name));
        }
        if leak.channels.binary {
            output.push_str(&format!("Signature detected in binary: {}\n", leak.name));
        }
        if leak.channels.metadata {
            output.push_str(&format!("Signature detected in metadata: {}\n", leak.name));
        }
        if leak.channels.watermark {
            output.push_str(&format!("Watermark matched: {}\n", leak.name));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ChannelSet;

    #[test]
    fn test_render_no_match() {
        assert_eq!(render_matches(&[]), "No match found.\n");
    }

    #[test]
    fn test_render_every_channel_line() {
        let matches = vec![LeakMatch {
            name: "Alice".into(),
            channels: ChannelSet {
                hash: true,
                binary: true,
                metadata: true,
                watermark: true,
            },
        }];
        let report = render_matches(&matches);
        assert!(report.contains("File hash matched: Alice"));
        assert!(report.contains("Signature detected in binary: Alice"));
        assert!(report.contains("Signature detected in metadata: Alice"));
        assert!(report.contains("Watermark matched: Alice"));
    }

    #[test]
    fn test_render_partial_channels() {
        let matches = vec![LeakMatch {
            name: "Bob".into(),
            channels: ChannelSet {
                binary: true,
                ..Default::default()
            },
        }];
        let report = render_matches(&matches);
        assert_eq!(report, "Signature detected in binary: Bob\n");
    }
}
