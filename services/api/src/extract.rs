//! services/api/src/extract.rs
//!
//! Turns an uploaded resume (PDF, DOCX or plain text) into a single trimmed string.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// The only file extensions a resume may carry.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported resume format '{0}'. Use .pdf, .docx, or .txt")]
    UnsupportedFormat(String),
    #[error("Failed to read resume: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("DOCX parse error: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Txt,
}

impl ResumeFormat {
    /// Picks the format from a file name's extension, ignoring case.
    pub fn from_file_name(name: &str) -> Result<Self, ExtractError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            _ => Err(ExtractError::UnsupportedFormat(ext)),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

/// Extracts the text of the resume at `path`, dispatching on its extension.
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    let name = path.to_string_lossy();
    let text = match ResumeFormat::from_file_name(&name)? {
        ResumeFormat::Pdf => load_pdf(path)?,
        ResumeFormat::Docx => load_docx(path)?,
        ResumeFormat::Txt => fs::read_to_string(path)?,
    };
    Ok(text.trim().to_string())
}

/// Writes uploaded bytes to a temporary file named after the upload and extracts it.
///
/// The extension is checked before anything touches the disk. The temporary file
/// is removed when this returns; a failed removal is ignored.
pub fn extract_upload(file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
    let format = ResumeFormat::from_file_name(file_name)?;

    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;

    extract(file.path())
}

fn load_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    // Pages without a text layer contribute nothing.
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn load_docx(path: &Path) -> Result<String, ExtractError> {
    let file = fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?
        .read_to_string(&mut xml)?;

    Ok(docx_paragraphs(&xml)?.join("\n"))
}

/// Collects the text of every `<w:p>` paragraph in a WordprocessingML body.
///
/// Paragraphs nest when a text box sits inside one; the inner paragraph is
/// emitted first and the outer one keeps the text on both sides of the box.
/// `mc:Fallback` repeats the `mc:Choice` content for older readers and is skipped.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut fallback_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Docx(e.to_string()))?;
        match event {
            Event::Start(e) if e.name().as_ref() == b"mc:Fallback" => fallback_depth += 1,
            Event::End(e) if e.name().as_ref() == b"mc:Fallback" => {
                fallback_depth = fallback_depth.saturating_sub(1)
            }
            Event::Eof => break,
            _ if fallback_depth > 0 => {}
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(current)) => current.push('\t'),
                (b"w:br" | b"w:cr", Some(current)) => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    Ok(paragraphs)
}
