use crate::error::{Error, Result};
use crate::pipeline::EditorialResult;
use docx_rs::{
    AlignmentType, Docx, LineSpacing, Paragraph, Run, RunFonts, Style, StyleType,
};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};

const FONT_FAMILY: &str = "Calibri";
// Font sizes are half-points: 22 = 11pt.
const FONT_SIZE: usize = 22;
const HEADING_STYLE_ID: &str = "CustomHeading";
// Paragraph spacing is twentieths of a point: 120 = 6pt.
const SPACE_6PT: u32 = 120;

const TITLES_LABEL: &str = "Tytuły";
const LEADS_LABEL: &str = "Leady";
const TAGS_LABEL: &str = "Tagi";
const QUOTES_LABEL: &str = "Cytaty";
const TEXT_LABEL: &str = "Poprawiony tekst";

/// Renders the editorial result into docx bytes.
///
/// The document carries five fixed sections in order: titles, leads,
/// tags, quotes, corrected text. Title, lead and quote strings have
/// literal double-quote characters stripped. The tags section holds two
/// lines: the vocabulary tags prefixed `Tagi: ` and the free tags
/// prefixed `# `, both comma-joined with doubled-comma artifacts
/// collapsed. Styling is a fixed style sheet applied once per document,
/// so rendering the same result twice is byte-identical.
///
/// # Errors
///
/// Returns [`Error::Render`] if the document cannot be serialized.
pub fn render(result: &EditorialResult) -> Result<Vec<u8>> {
    let mut docx = base_document();

    docx = docx.add_paragraph(heading_paragraph(TITLES_LABEL));
    for title in &result.titles {
        docx = docx.add_paragraph(body_paragraph(&strip_quote_chars(title)));
    }
    docx = docx.add_paragraph(spacer_paragraph());

    docx = docx.add_paragraph(heading_paragraph(LEADS_LABEL));
    for lead in &result.leads {
        docx = docx.add_paragraph(body_paragraph(&strip_quote_chars(lead)));
    }
    docx = docx.add_paragraph(spacer_paragraph());

    docx = docx.add_paragraph(heading_paragraph(TAGS_LABEL));
    docx = docx.add_paragraph(body_paragraph(&format!(
        "Tagi: {}",
        join_tags(&result.tags_from_list)
    )));
    docx = docx.add_paragraph(body_paragraph(&format!("# {}", join_tags(&result.tags_free))));
    docx = docx.add_paragraph(spacer_paragraph());

    docx = docx.add_paragraph(heading_paragraph(QUOTES_LABEL));
    for quote in &result.quotes {
        docx = docx.add_paragraph(body_paragraph(&strip_quote_chars(quote)));
    }
    docx = docx.add_paragraph(spacer_paragraph());

    docx = docx.add_paragraph(heading_paragraph(TEXT_LABEL));
    for line in result.output_text.split('\n') {
        docx = docx.add_paragraph(body_paragraph(line));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| Error::render(e.to_string()))?;

    let bytes = buffer.into_inner();
    debug!("Rendered output document ({} bytes)", bytes.len());

    Ok(bytes)
}

/// Writes document bytes to disk atomically.
///
/// The content goes to a `.tmp` sibling first and is renamed into place
/// only after a full successful write; a failed write leaves no partial
/// output file behind.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or renamed.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    let outcome = write_temp(&temp_path, bytes)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));

    if outcome.is_err() {
        let _ = fs::remove_file(&temp_path);
    } else {
        info!("Wrote output document to {}", path.display());
    }

    outcome
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path).map_err(|e| Error::io(temp_path, e))?;
    file.write_all(bytes).map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    Ok(())
}

/// Creates the document shell with the static style sheet.
fn base_document() -> Docx {
    Docx::new()
        .default_fonts(RunFonts::new().ascii(FONT_FAMILY))
        .default_size(FONT_SIZE)
        .add_style(
            Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
                .name("Custom Heading")
                .fonts(RunFonts::new().ascii(FONT_FAMILY))
                .size(FONT_SIZE)
                .bold(),
        )
}

fn heading_paragraph(label: &str) -> Paragraph {
    Paragraph::new()
        .style(HEADING_STYLE_ID)
        .line_spacing(LineSpacing::new().before(SPACE_6PT).after(SPACE_6PT))
        .add_run(Run::new().add_text(label))
}

fn body_paragraph(text: &str) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Justified)
        .line_spacing(LineSpacing::new().before(0).after(SPACE_6PT))
        .add_run(Run::new().add_text(text))
}

fn spacer_paragraph() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(""))
}

fn strip_quote_chars(text: &str) -> String {
    text.replace('"', "")
}

/// Comma-joins tag items, collapsing the doubled-comma artifacts that
/// empty entries produce.
fn join_tags(tags: &[String]) -> String {
    tags.join(", ").replace(",, ", ", ").replace(", , ", ", ")
}
