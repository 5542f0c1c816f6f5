//! Turn double-sided A3 landscape scans back into A4 portrait pages.
//!
//! A folded A3 sheet carries four A4 pages: the front scan holds pages 4 and
//! 1 (left, right) and the back scan pages 2 and 3. Each front/back pair of
//! scanned pages is cropped into its halves and re-emitted in reading order:
//! front-right, back-left, back-right, front-left. Only page boxes change;
//! content streams are shared with the source pages.

use super::document::Rect;
use super::PdfDocument;
use anyhow::Result;
use lopdf::Dictionary;
use std::path::Path;

/// Page boxes dropped from emitted pages so viewers fall back to the MediaBox.
const CLIP_BOXES: &[&[u8]] = &[b"CropBox", b"BleedBox", b"TrimBox", b"ArtBox"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum SplitOutcome {
    /// Portrait scan, nothing written.
    Unchanged,
    /// Landscape scan written as `pages` portrait pages.
    Split { pages: u32 },
}

impl SplitOutcome {
    pub fn is_split(&self) -> bool {
        matches!(self, SplitOutcome::Split { .. })
    }
}

/// Split `input` into portrait pages written to `output`. Portrait documents
/// (judged by their second page) and documents with fewer than two pages
/// are left alone and `output` is not created.
pub fn split_booklet<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<SplitOutcome> {
    let mut pdf = PdfDocument::open(&input)?;
    let pages = pdf.page_ids();
    if pages.len() < 2 {
        log::debug!(
            "{} has {} page(s), not splitting",
            input.as_ref().display(),
            pages.len()
        );
        return Ok(SplitOutcome::Unchanged);
    }

    // Orientation comes from the second page, not the first.
    let reference = pdf.media_box(pages[1].1)?;
    if reference.is_portrait() {
        return Ok(SplitOutcome::Unchanged);
    }
    let (left, right) = reference.halves();

    if pages.len() % 2 == 1 {
        log::warn!(
            "{} has an odd number of pages ({}), dropping page {}",
            input.as_ref().display(),
            pages.len(),
            pages.len()
        );
    }

    let mut out = Vec::with_capacity(pages.len() * 2);
    for pair in pages.chunks_exact(2) {
        let front = pdf.resolved_page(pair[0].1)?;
        let back = pdf.resolved_page(pair[1].1)?;
        out.push(cropped(&front, right));
        out.push(cropped(&back, left));
        out.push(cropped(&back, right));
        out.push(cropped(&front, left));
    }

    let count = out.len() as u32;
    pdf.replace_pages(out)?;
    pdf.save(&output)?;
    Ok(SplitOutcome::Split { pages: count })
}

fn cropped(page: &Dictionary, media_box: Rect) -> Dictionary {
    let mut page = page.clone();
    for key in CLIP_BOXES {
        page.remove(key);
    }
    page.set("MediaBox", media_box.to_object());
    page
}
