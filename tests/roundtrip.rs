//! Embed-then-detect round trips through the public library API.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use tracemark::cli::{detect_leak, generate_campaign};
use tracemark::embed::EmbedOptions;
use tracemark::metadata::MetadataEditor;
use tracemark::project::Project;
use tracemark::Result;

/// In-memory stand-in for the external metadata tool.
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
fn plain_text_roundtrip_attributes_only_the_leaker() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("report.txt");
    let targets = dir.path().join("targets.txt");
    std::fs::write(&base, b"Confidential: board meeting notes\n").unwrap();
    std::fs::write(&targets, "Alice,a@x.com\nBob,b@x.com\n").unwrap();

    let project = Project::new(dir.path(), "campaign");
    let editor = FakeEditor::new();
    let records = generate_campaign(
        &project,
        &base,
        &targets,
        &EmbedOptions::default(),
        &editor,
    )
    .unwrap();

    // Alice's unmodified copy: hash, binary, and metadata channels, no
    // watermark (plain text is not a PDF), and no Bob
    let alice_copy = &records[0].result_path;
    let matches = detect_leak(&project, alice_copy, &editor).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Alice");
    assert!(matches[0].channels.hash);
    assert!(matches[0].channels.binary);
    assert!(matches[0].channels.metadata);
    assert!(!matches[0].channels.watermark);
}

#[test]
fn detection_survives_partial_signal_loss() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("notes.txt");
    let targets = dir.path().join("targets.txt");
    std::fs::write(&base, b"internal notes\n").unwrap();
    std::fs::write(&targets, "Alice,a@x.com\nBob,b@x.com\n").unwrap();

    let project = Project::new(dir.path(), "campaign");
    let editor = FakeEditor::new();
    let records = generate_campaign(
        &project,
        &base,
        &targets,
        &EmbedOptions::default(),
        &editor,
    )
    .unwrap();

    // The leaker prepended content before sharing: hash no longer matches
    // and the fake metadata store knows nothing about the new path, but the
    // appended token still identifies Bob.
    let leaked = dir.path().join("leaked.txt");
    let mut content = b"FWD: ".to_vec();
    content.extend(std::fs::read(&records[1].result_path).unwrap());
    std::fs::write(&leaked, &content).unwrap();

    let matches = detect_leak(&project, &leaked, &editor).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Bob");
    assert!(!matches[0].channels.hash);
    assert!(matches[0].channels.binary);
}

#[test]
fn pdf_roundtrip_includes_watermark_channel() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("report.pdf");
    let targets = dir.path().join("targets.txt");
    write_minimal_pdf(&base, "Earnings overview");
    std::fs::write(&targets, "Alice,a@x.com\n").unwrap();

    let project = Project::new(dir.path(), "campaign");
    let editor = FakeEditor::new();
    let records = generate_campaign(
        &project,
        &base,
        &targets,
        &EmbedOptions::default(),
        &editor,
    )
    .unwrap();

    let matches = detect_leak(&project, &records[0].result_path, &editor).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Alice");
    assert!(matches[0].channels.hash);
    assert!(matches[0].channels.binary);
    assert!(matches[0].channels.watermark);
}

#[test]
fn unrelated_suspect_yields_empty_report() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("report.txt");
    let targets = dir.path().join("targets.txt");
    std::fs::write(&base, b"body\n").unwrap();
    std::fs::write(&targets, "Alice,a@x.com\nBob,b@x.com\n").unwrap();

    let project = Project::new(dir.path(), "campaign");
    let editor = FakeEditor::new();
    generate_campaign(
        &project,
        &base,
        &targets,
        &EmbedOptions::default(),
        &editor,
    )
    .unwrap();

    let suspect = dir.path().join("other.txt");
    std::fs::write(&suspect, b"never fingerprinted").unwrap();

    let matches = detect_leak(&project, &suspect, &editor).unwrap();
    assert!(matches.is_empty());
}

/// Minimal one-page PDF, enough for the watermark and extraction paths.
fn write_minimal_pdf(path: &Path, body_text: &str) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Real(24.0)]),
            Operation::new("Td", vec![Object::Real(72.0), Object::Real(700.0)]),
            Operation::new("Tj", vec![Object::string_literal(body_text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
