use crate::error::{Error, Result};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Extracts the body text of a docx document.
///
/// Paragraph texts are concatenated in document order, joined by a
/// newline, so paragraph breaks survive as line separators.
///
/// # Errors
///
/// Returns [`Error::Ingestion`] if the file cannot be read or is not a
/// parseable docx archive. The pipeline is never entered on failure.
pub fn read_docx(path: &Path) -> Result<String> {
    info!("Reading document {}", path.display());

    let bytes = fs::read(path).map_err(|e| Error::ingestion(path, e.to_string()))?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| Error::ingestion(path, e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for content in &paragraph.children {
                if let ParagraphChild::Run(run) = content {
                    for piece in &run.children {
                        if let RunChild::Text(t) = piece {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    debug!("Extracted {} paragraphs", paragraphs.len());

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let file = fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[test]
    fn test_reads_paragraphs_joined_by_newline() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("artykul.docx");
        write_docx(
            input.path(),
            &["Pierwszy akapit.", "Drugi akapit.", "Trzeci akapit."],
        );

        let text = read_docx(input.path()).unwrap();
        assert_eq!(text, "Pierwszy akapit.\nDrugi akapit.\nTrzeci akapit.");
    }

    #[test]
    fn test_missing_file_is_ingestion_error() {
        let err = read_docx(Path::new("/nonexistent/artykul.docx")).unwrap_err();
        assert!(err.is_ingestion());
    }

    #[test]
    fn test_garbage_file_is_ingestion_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("nie-docx.docx");
        input.write_str("to nie jest archiwum docx").unwrap();

        let err = read_docx(input.path()).unwrap_err();
        assert!(err.is_ingestion());
    }

    #[test]
    fn test_empty_document() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("pusty.docx");
        write_docx(input.path(), &[]);

        let text = read_docx(input.path()).unwrap();
        assert!(text.is_empty());
    }
}
