use crate::error::{Result, TracemarkError};
use crate::format::FormatFamily;
use crate::hash::sha256_hex;
use crate::metadata::MetadataEditor;
use crate::store::RecipientRecord;
use crate::watermark;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Per-chunk read size for the binary scan.
const SCAN_CHUNK: usize = 64 * 1024;

/// Which of the four independent signal channels matched for one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelSet {
    pub hash: bool,
    pub binary: bool,
    pub metadata: bool,
    pub watermark: bool,
}

impl ChannelSet {
    pub fn any(&self) -> bool {
        self.hash || self.binary || self.metadata || self.watermark
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakMatch {
    pub name: String,
    pub channels: ChannelSet,
}

/// Evaluate every stored signature against the suspect file, across all four
/// channels, and report every recipient with at least one matching channel.
///
/// Exhaustive by contract: no early exit after a match, channels are not
/// mutually exclusive, and an empty result means "no match", not failure.
pub fn detect(
    suspect: &Path,
    records: &[RecipientRecord],
    editor: &dyn MetadataEditor,
) -> Result<Vec<LeakMatch>> {
    if !suspect.exists() {
        return Err(TracemarkError::MissingFile(suspect.to_path_buf()));
    }

    let suspect_hash = sha256_hex(suspect)?;
    let family = FormatFamily::classify_path(suspect);

    // Field selection follows the same policy as embedding; an absent field
    // reads as None and simply fails to match.
    let metadata_value = editor.read_field(suspect, family.metadata_field())?;
    let page_text = if family.supports_watermark() {
        Some(watermark::extract_text(suspect)?)
    } else {
        None
    };

    let needles: Vec<&[u8]> = records
        .iter()
        .map(|r| r.signature.as_str().as_bytes())
        .collect();
    let binary_hits = scan_for_needles(suspect, &needles)?;

    let mut matches = Vec::new();
    for (record, binary) in records.iter().zip(binary_hits) {
        let sig = record.signature.as_str();
        let channels = ChannelSet {
            hash: suspect_hash == record.result_hash,
            binary,
            metadata: metadata_value
                .as_deref()
                .is_some_and(|value| value.contains(sig)),
            watermark: page_text.as_deref().is_some_and(|text| text.contains(sig)),
        };
        if channels.any() {
            matches.push(LeakMatch {
                name: record.name.clone(),
                channels,
            });
        }
    }
    Ok(matches)
}

/// Single bounded-memory pass over the file, reporting for each needle
/// whether it occurs as a contiguous byte substring anywhere.
///
/// Chunks overlap by the longest needle minus one, so matches straddling a
/// chunk boundary are still seen. Deliberately byte-oriented, not
/// line-oriented: files with no newlines or pathologically long lines scan
/// the same as ordinary text.
fn scan_for_needles(path: &Path, needles: &[&[u8]]) -> Result<Vec<bool>> {
    let mut hits = vec![false; needles.len()];
    let max_len = needles.iter().map(|n| n.len()).max().unwrap_or(0);
    if max_len == 0 {
        return Ok(hits);
    }

    let overlap = max_len - 1;
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; SCAN_CHUNK + overlap];
    let mut filled = 0usize;

    loop {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            return Ok(hits);
        }
        filled += n;

        let window = &buf[..filled];
        for (hit, needle) in hits.iter_mut().zip(needles) {
            if !*hit && contains(window, needle) {
                *hit = true;
            }
        }
        if hits.iter().all(|h| *h) {
            return Ok(hits);
        }

        if filled > overlap {
            buf.copy_within(filled - overlap..filled, 0);
            filled = overlap;
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}
