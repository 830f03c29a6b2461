//! PDF attachment extraction

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    error::{Error, Result},
    handle::SessionHandle,
    message::UploadedFile,
    notification::NotificationKind,
};

/// Turns PDF bytes into per-page text
pub trait PdfExtractor: Send + Sync {
    /// Extract the text of every page, in page order.
    fn extract_pages(&self, bytes: &[u8]) -> std::result::Result<Vec<String>, String>;
}

/// Extractor backed by the `pdf-extract` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractLib;

impl PdfExtractor for PdfExtractLib {
    fn extract_pages(&self, bytes: &[u8]) -> std::result::Result<Vec<String>, String> {
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())
    }
}

/// Result of attaching one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Extracted and appended to the attachment list
    Added { name: String },
    /// Rejected by extension; nothing was read
    Unsupported { name: String },
    /// Reading or extraction failed
    Failed { name: String, error: String },
}

impl UploadOutcome {
    pub fn name(&self) -> &str {
        match self {
            UploadOutcome::Added { name }
            | UploadOutcome::Unsupported { name }
            | UploadOutcome::Failed { name, .. } => name,
        }
    }

    /// Banner text for this outcome
    pub fn notification(&self) -> (NotificationKind, String) {
        match self {
            UploadOutcome::Added { name } => (
                NotificationKind::Success,
                format!("{} uploaded successfully!", name),
            ),
            UploadOutcome::Unsupported { name } => {
                (NotificationKind::Error, format!("Unsupported file: {}", name))
            }
            UploadOutcome::Failed { name, .. } => {
                (NotificationKind::Error, format!("Failed to parse {}", name))
            }
        }
    }
}

/// Extracts attachments off the async runtime
#[derive(Clone)]
pub struct ExtractionService {
    extractor: Arc<dyn PdfExtractor>,
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new(Arc::new(PdfExtractLib))
    }
}

impl ExtractionService {
    pub fn new(extractor: Arc<dyn PdfExtractor>) -> Self {
        Self { extractor }
    }

    /// Read and extract one PDF.
    pub async fn extract_file(&self, path: &Path) -> Result<UploadedFile> {
        let name = display_name(path);
        if !is_pdf(path) {
            return Err(Error::UnsupportedFile(name));
        }

        let bytes = tokio::fs::read(path).await?;
        let extractor = Arc::clone(&self.extractor);
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
            .await
            .map_err(|e| Error::Extraction {
                name: name.clone(),
                message: e.to_string(),
            })?
            .map_err(|message| Error::Extraction {
                name: name.clone(),
                message,
            })?;

        tracing::debug!(file = %name, pages = pages.len(), "extracted attachment");

        Ok(UploadedFile::new(name, format_pages(&pages)))
    }

    /// Attach each path in order, notifying through the handle as each
    /// one finishes. A failure does not stop the rest of the batch.
    pub async fn upload(&self, paths: &[PathBuf], handle: &SessionHandle) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(paths.len());

        for path in paths {
            let outcome = match self.extract_file(path).await {
                Ok(file) => {
                    let name = file.name.clone();
                    handle.add_file(file);
                    UploadOutcome::Added { name }
                }
                Err(Error::UnsupportedFile(name)) => UploadOutcome::Unsupported { name },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "attachment failed: {}", e);
                    UploadOutcome::Failed {
                        name: display_name(path),
                        error: e.to_string(),
                    }
                }
            };

            let (kind, message) = outcome.notification();
            handle.notify(kind, message);
            outcomes.push(outcome);
        }

        outcomes
    }
}

/// `"Page {n}: {words}\n"` per page, numbered from 1.
pub fn format_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let words = page.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("Page {}: {}\n", i + 1, words)
        })
        .collect()
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
