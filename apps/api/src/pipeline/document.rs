//! Document text extraction — turns an uploaded PDF or DOCX into plain text.

use std::path::Path;

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

/// Terminal errors for one upload. The caller marks the record `error` and
/// surfaces the message; no partial claim set is persisted.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse document: {0}")]
    ParseFailure(String),
}

/// Extracts plain text from a resume file, dispatching on the extension.
///
/// `.docx` yields paragraph texts joined by newlines in document order;
/// `.pdf` yields page texts concatenated in page order. Read-only, single
/// pass, no retries.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => extract_pdf(path),
        "docx" => extract_docx(path),
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    pdf_extract::extract_text(path).map_err(|e| ExtractError::ParseFailure(e.to_string()))
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::ParseFailure(e.to_string()))?;
    let docx = read_docx(&bytes).map_err(|e| ExtractError::ParseFailure(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for para_child in &paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = extract_text(Path::new("resume.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = extract_text(Path::new("resume")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        // Missing file, but the PDF branch is taken: failure mode is parse, not format.
        let err = extract_text(Path::new("/nonexistent/resume.PDF")).unwrap_err();
        assert!(matches!(err, ExtractError::ParseFailure(_)));
    }

    #[test]
    fn test_missing_pdf_is_parse_failure() {
        let err = extract_text(Path::new("/nonexistent/resume.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::ParseFailure(_)));
    }

    #[test]
    fn test_garbage_docx_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"this is not a zip archive").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractError::ParseFailure(_)));
    }
}
