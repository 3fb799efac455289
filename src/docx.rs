//! DOCX export: a bold heading followed by justified body paragraphs,
//! assembled with `docx-rs`.

use std::io::Cursor;
use std::path::PathBuf;

use docx_rs::{AlignmentType, Docx, Paragraph, Run};

use crate::error::{OffgenError, OffgenResult};
use crate::output::OutputDir;

// Run sizes are half-points.
const TITLE_HALF_POINTS: usize = 32;

/// Build the complete DOCX archive in memory.
pub fn build_docx(title: &str, body: &str) -> OffgenResult<Vec<u8>> {
    let mut docx = Docx::new().add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(title).size(TITLE_HALF_POINTS).bold()),
    );
    for paragraph in body.split('\n') {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(paragraph))
                .align(AlignmentType::Justified),
        );
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| OffgenError::generation(format!("failed to pack docx: {e}")))?;
    Ok(buf.into_inner())
}

/// Build the document and write it as `doc_*.docx` under `out`.
pub fn write_docx(title: &str, body: &str, out: &OutputDir) -> OffgenResult<PathBuf> {
    let bytes = build_docx(title, body)?;
    let path = out.unique_path("doc", "docx");
    std::fs::write(&path, bytes).map_err(|e| {
        OffgenError::generation(format!("failed to write docx '{}': {e}", path.display()))
    })?;
    tracing::info!(path = %path.display(), "wrote docx");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_docx_produces_a_zip_archive() {
        let bytes = build_docx("Title", "First paragraph.\nSecond paragraph.").unwrap();
        // DOCX is a ZIP container.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_body_still_packs() {
        let bytes = build_docx("Title", "").unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
