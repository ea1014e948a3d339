use crate::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Watermark placement policy: low opacity so the text stays visually
/// unobtrusive, no rotation, sized to span most of the page width so it
/// remains machine-recoverable by plain text extraction.
const WATERMARK_OPACITY: f32 = 0.10;
const WATERMARK_WIDTH_RATIO: f32 = 0.90;
const MIN_FONT_SIZE: f32 = 8.0;
const MAX_FONT_SIZE: f32 = 48.0;

const FONT_KEY: &str = "TmF0";
const GSTATE_KEY: &str = "TmGS";

/// Overlay `text` as a semi-transparent watermark on every page of the PDF,
/// rewriting the file in place.
pub fn apply_watermark(path: &Path, text: &str) -> Result<()> {
    let mut doc = Document::load(path)?;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let gs_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(WATERMARK_OPACITY),
        "CA" => Object::Real(WATERMARK_OPACITY),
    });

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in page_ids {
        let (width, height) = page_size(&doc, page_id);

        // Helvetica averages roughly half the point size per glyph
        let glyphs = text.chars().count().max(1) as f32;
        let size = (WATERMARK_WIDTH_RATIO * width / (0.5 * glyphs))
            .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let x = (1.0 - WATERMARK_WIDTH_RATIO) / 2.0 * width;
        let y = height / 2.0;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("gs", vec![Object::Name(GSTATE_KEY.into())]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(FONT_KEY.into()), Object::Real(size)],
                ),
                Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };
        let stream_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        attach_resources(&mut doc, page_id, font_id, gs_id)?;
        append_content(&mut doc, page_id, stream_id)?;
    }

    doc.save(path)?;
    Ok(())
}

/// Extract the plain text of every page, concatenated. Used by the detector's
/// watermark channel.
pub fn extract_text(path: &Path) -> Result<String> {
    let doc = Document::load(path)?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    Ok(doc.extract_text(&pages)?)
}

fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let media_box = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .and_then(|d| d.get(b"MediaBox"))
        .and_then(|o| match o {
            Object::Reference(id) => doc.get_object(*id),
            other => Ok(other),
        })
        .and_then(|o| o.as_array())
        .ok()
        .and_then(|arr| {
            if arr.len() == 4 {
                Some((
                    to_f32(&arr[2])? - to_f32(&arr[0])?,
                    to_f32(&arr[3])? - to_f32(&arr[1])?,
                ))
            } else {
                None
            }
        });
    // US Letter when the page (or its ancestors) declares nothing usable
    media_box.unwrap_or((612.0, 792.0))
}

fn to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Make the watermark font and graphics state reachable from the page's
/// resource dictionary, preserving whatever resources are already there.
fn attach_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gs_id: ObjectId,
) -> Result<()> {
    enum Location {
        Referenced(ObjectId),
        OnPage,
    }

    let (location, mut resources) = {
        let page = doc.get_object(page_id)?.as_dict()?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => {
                let dict = doc.get_object(*id)?.as_dict()?.clone();
                (Location::Referenced(*id), dict)
            }
            Ok(Object::Dictionary(dict)) => (Location::OnPage, dict.clone()),
            _ => (Location::OnPage, Dictionary::new()),
        }
    };

    let mut fonts = resolve_subdict(doc, &resources, b"Font");
    fonts.set(FONT_KEY, font_id);
    resources.set("Font", Object::Dictionary(fonts));

    let mut gstates = resolve_subdict(doc, &resources, b"ExtGState");
    gstates.set(GSTATE_KEY, gs_id);
    resources.set("ExtGState", Object::Dictionary(gstates));

    match location {
        Location::Referenced(id) => {
            doc.objects.insert(id, Object::Dictionary(resources));
        }
        Location::OnPage => {
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            page.set("Resources", Object::Dictionary(resources));
        }
    }
    Ok(())
}

fn resolve_subdict(doc: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    match resources.get(key) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(|o| o.as_dict())
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    }
}

fn append_content(doc: &mut Document, page_id: ObjectId, stream_id: ObjectId) -> Result<()> {
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let new_contents = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => {
            Object::Array(vec![Object::Reference(*id), Object::Reference(stream_id)])
        }
        Ok(Object::Array(existing)) => {
            let mut array = existing.clone();
            array.push(Object::Reference(stream_id));
            Object::Array(array)
        }
        _ => Object::Reference(stream_id),
    };
    page.set("Contents", new_contents);
    Ok(())
}
