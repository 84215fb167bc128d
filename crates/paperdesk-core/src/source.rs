//! Where a paper comes from when it is summarized or reviewed.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PaperdeskError, Result};

pub const PDF_MIME: &str = "application/pdf";

/// Which of the two inputs a submission uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Arxiv,
    Upload,
}

/// A file picked by the user, before it is accepted.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Read a file from disk and detect its MIME type.
    ///
    /// A file counts as `application/pdf` only when it has a `.pdf`
    /// extension and starts with the `%PDF-` signature.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "paper.pdf".to_string());
        let mime = detect_mime(path, &bytes).to_string();
        Ok(Self { name, mime, bytes })
    }
}

fn detect_mime(path: &Path, bytes: &[u8]) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" if bytes.starts_with(b"%PDF-") => PDF_MIME,
        "txt" | "md" | "tex" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// A file that passed the PDF check. Only constructible through [`PdfFile::accept`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    name: String,
    bytes: Vec<u8>,
}

impl PdfFile {
    pub fn accept(file: SelectedFile) -> Result<Self> {
        if file.mime != PDF_MIME {
            return Err(PaperdeskError::validation(
                "Invalid File",
                "Please upload a PDF file.",
            ));
        }
        Ok(Self {
            name: file.name,
            bytes: file.bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A validated submission, ready to go over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperSource {
    Arxiv(String),
    Upload(PdfFile),
}

/// User-edited source state shared by the summarizer and the reviewer.
#[derive(Debug, Clone, Default)]
pub struct SourceSelection {
    pub kind: SourceKind,
    pub arxiv_id: String,
    file: Option<PdfFile>,
}

impl SourceSelection {
    pub fn arxiv(id: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Arxiv,
            arxiv_id: id.into(),
            file: None,
        }
    }

    /// Hold a new file. A non-PDF selection leaves the held file untouched.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<()> {
        let pdf = PdfFile::accept(file)?;
        self.file = Some(pdf);
        Ok(())
    }

    pub fn file(&self) -> Option<&PdfFile> {
        self.file.as_ref()
    }

    /// Snapshot the active source, rejecting missing input.
    ///
    /// `noun` names the operation in the "File Required" message
    /// ("summarize", "review").
    pub fn resolve(&self, noun: &str) -> Result<PaperSource> {
        match self.kind {
            SourceKind::Arxiv => {
                let id = self.arxiv_id.trim();
                if id.is_empty() {
                    return Err(PaperdeskError::validation(
                        "arXiv ID Required",
                        "Please enter a valid arXiv paper ID.",
                    ));
                }
                Ok(PaperSource::Arxiv(id.to_string()))
            }
            SourceKind::Upload => match self.file {
                Some(ref file) => Ok(PaperSource::Upload(file.clone())),
                None => Err(PaperdeskError::validation(
                    "File Required",
                    format!("Please upload a PDF file to {noun}."),
                )),
            },
        }
    }
}
