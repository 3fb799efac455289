//! PDF export: US-letter document with a bold heading and a justified body,
//! written with `pdf-writer` using the built-in Type1 Helvetica fonts.

use std::path::PathBuf;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::afm::{self, FontWidths};
use crate::error::{OffgenError, OffgenResult};
use crate::output::OutputDir;

/// US-letter page size in points.
pub const PAGE_WIDTH: f32 = 612.0;
/// See [`PAGE_WIDTH`].
pub const PAGE_HEIGHT: f32 = 792.0;
/// Uniform page margin in points.
pub const PAGE_MARGIN: f32 = 72.0;

const TITLE_SIZE: f32 = 18.0;
const TITLE_LEADING: f32 = 22.0;
const TITLE_GAP: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 14.0;

const FONT_BODY: Name<'static> = Name(b"F1");
const FONT_HEADING: Name<'static> = Name(b"F2");

/// One placed line of page content.
struct PlacedLine {
    x: f32,
    /// Baseline y in PDF coordinates (origin bottom-left).
    y: f32,
    font: Name<'static>,
    size: f32,
    /// Extra inter-word spacing applied for justification (`Tw`).
    word_spacing: f32,
    bytes: Vec<u8>,
}

/// Greedy word wrap against measured point widths.
///
/// Breaks on whitespace only; a single word wider than `max_width` lands on
/// its own overflowing line, consistent with the canvas fitter's policy.
pub(crate) fn wrap_to_width(
    text: &str,
    widths: &FontWidths,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if widths.text_width(&candidate, size) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn justify_word_spacing(line: &str, widths: &FontWidths, size: f32, column: f32) -> f32 {
    let spaces = line.matches(' ').count();
    if spaces == 0 {
        return 0.0;
    }
    let slack = column - widths.text_width(line, size);
    if slack <= 0.0 {
        return 0.0;
    }
    slack / spaces as f32
}

/// Lay the document out into pages of placed lines.
fn layout_document(title: &str, body: &str) -> Vec<Vec<PlacedLine>> {
    let column = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let mut pages: Vec<Vec<PlacedLine>> = Vec::new();
    let mut current: Vec<PlacedLine> = Vec::new();
    let mut y = PAGE_HEIGHT - PAGE_MARGIN - TITLE_SIZE;

    let mut place = |pages: &mut Vec<Vec<PlacedLine>>,
                     current: &mut Vec<PlacedLine>,
                     y: &mut f32,
                     leading: f32,
                     mut line: PlacedLine| {
        if *y < PAGE_MARGIN {
            pages.push(std::mem::take(current));
            *y = PAGE_HEIGHT - PAGE_MARGIN - leading;
        }
        line.y = *y;
        current.push(line);
        *y -= leading;
    };

    for line in wrap_to_width(title, &afm::HELVETICA_BOLD, TITLE_SIZE, column) {
        place(
            &mut pages,
            &mut current,
            &mut y,
            TITLE_LEADING,
            PlacedLine {
                x: PAGE_MARGIN,
                y: 0.0,
                font: FONT_HEADING,
                size: TITLE_SIZE,
                word_spacing: 0.0,
                bytes: afm::winansi_bytes(line.trim_end()),
            },
        );
    }
    y -= TITLE_GAP;

    for paragraph in body.split('\n') {
        let lines = wrap_to_width(paragraph, &afm::HELVETICA, BODY_SIZE, column);
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            // The last line of each paragraph stays left-aligned.
            let word_spacing = if i == last {
                0.0
            } else {
                justify_word_spacing(line, &afm::HELVETICA, BODY_SIZE, column)
            };
            place(
                &mut pages,
                &mut current,
                &mut y,
                BODY_LEADING,
                PlacedLine {
                    x: PAGE_MARGIN,
                    y: 0.0,
                    font: FONT_BODY,
                    size: BODY_SIZE,
                    word_spacing,
                    bytes: afm::winansi_bytes(line),
                },
            );
        }
    }

    pages.push(current);
    pages
}

/// Build the complete PDF document in memory.
pub fn build_pdf(title: &str, body: &str) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let body_font_id = Ref::new(3);
    let heading_font_id = Ref::new(4);
    let info_id = Ref::new(5);
    let mut next_id = 6;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let pages = layout_document(title, body);
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();

    let mut pdf = Pdf::new();
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr("offgen"));
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    for ((placed, &page_id), &content_id) in pages.iter().zip(&page_ids).zip(&content_ids) {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(FONT_BODY, body_font_id);
        fonts.pair(FONT_HEADING, heading_font_id);
        fonts.finish();
        resources.finish();
        page.finish();

        let mut content = Content::new();
        for line in placed {
            content.set_word_spacing(line.word_spacing);
            content.begin_text();
            content.set_font(line.font, line.size);
            content.next_line(line.x, line.y);
            content.show(Str(&line.bytes));
            content.end_text();
        }
        content.set_word_spacing(0.0);
        pdf.stream(content_id, &content.finish());
    }

    pdf.type1_font(body_font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(heading_font_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.finish()
}

/// Build the document and write it as `doc_*.pdf` under `out`.
pub fn write_pdf(title: &str, body: &str, out: &OutputDir) -> OffgenResult<PathBuf> {
    let bytes = build_pdf(title, body);
    let path = out.unique_path("doc", "pdf");
    std::fs::write(&path, bytes).map_err(|e| {
        OffgenError::generation(format!("failed to write pdf '{}': {e}", path.display()))
    })?;
    tracing::info!(path = %path.display(), "wrote pdf");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_to_width_breaks_on_whitespace() {
        let lines = wrap_to_width(
            "alpha beta gamma delta",
            &afm::HELVETICA,
            11.0,
            // Wide enough for roughly two of these words.
            60.0,
        );
        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(!line.starts_with(' '));
            assert!(!line.ends_with(' '));
        }
    }

    #[test]
    fn wrap_to_width_keeps_overlong_word_whole() {
        let word = "a".repeat(200);
        let lines = wrap_to_width(&word, &afm::HELVETICA, 11.0, 60.0);
        assert_eq!(lines, vec![word]);
    }

    #[test]
    fn justification_never_goes_negative() {
        let tw = justify_word_spacing("a line already wider than the column", &afm::HELVETICA, 100.0, 10.0);
        assert_eq!(tw, 0.0);
    }

    #[test]
    fn build_pdf_produces_a_pdf_header() {
        let bytes = build_pdf("My PDF", "Hello world!\nSecond paragraph.");
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Helvetica"));
        assert!(text.contains("Helvetica-Bold"));
    }

    #[test]
    fn long_body_paginates() {
        let body = "word ".repeat(5000);
        let pages = layout_document("T", &body);
        assert!(pages.len() > 1);
        for page in &pages {
            for line in page {
                assert!(line.y >= PAGE_MARGIN - BODY_LEADING);
                assert!(line.y <= PAGE_HEIGHT - PAGE_MARGIN);
            }
        }
    }
}
