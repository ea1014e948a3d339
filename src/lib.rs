//! Tracemark - Leak-Attribution Document Fingerprinting
//!
//! Tracks leaked confidential documents back to the recipient they were
//! distributed to. Each recipient gets a uniquely fingerprinted copy of a
//! base document; given a suspect file later, the detector reports which
//! recipient(s) it traces back to.
//!
//! ## Channels
//!
//! A signature is embedded through up to four independent channels, chosen
//! by format family, and detection evaluates all of them so partial signal
//! loss (stripped metadata, truncated binary) still attributes the leak:
//!
//! - **Hash**: SHA-256 of the fully fingerprinted copy, for byte-identical
//!   leaks
//! - **Binary**: the signature token appended as raw bytes at end-of-file
//!   (never for zip-based document packages)
//! - **Metadata**: a format-specific field (Creator/Producer/Software/Title),
//!   patched inside the package for Office documents, via an external
//!   metadata tool otherwise
//! - **Watermark**: semi-transparent text across every PDF page
//!
//! ## Example
//!
//! ```no_run
//! use tracemark::cli::{detect_leak, generate_campaign, render_matches};
//! use tracemark::embed::EmbedOptions;
//! use tracemark::metadata::NullEditor;
//! use tracemark::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new(".", "q3-board-deck");
//! generate_campaign(
//!     &project,
//!     Path::new("report.pdf"),
//!     Path::new("targets.txt"),
//!     &EmbedOptions::default(),
//!     &NullEditor,
//! ).unwrap();
//!
//! let matches = detect_leak(&project, Path::new("found-on-pastebin.pdf"), &NullEditor).unwrap();
//! print!("{}", render_matches(&matches));
//! ```

pub mod cli;
pub mod detect;
pub mod embed;
pub mod error;
pub mod format;
pub mod hash;
pub mod metadata;
pub mod project;
pub mod repack;
pub mod signature;
pub mod store;
pub mod targets;
pub mod watermark;

pub use detect::{detect, ChannelSet, LeakMatch};
pub use error::{Result, TracemarkError};
pub use format::FormatFamily;
pub use signature::{Signature, SIGNATURE_TAG};
pub use store::{FingerprintStore, RecipientRecord};
