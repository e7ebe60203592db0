//! Source document text extraction.
//!
//! PDF files go through `pdf-extract`; `.txt` and `.md` files are taken
//! verbatim. A batch is all-or-nothing: the first failing document aborts it.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extraction errors.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not extract text from {path}: {message}")]
    Pdf { path: String, message: String },

    #[error("unsupported document type: {0}")]
    Unsupported(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Converts one document's bytes into its text, pages in order.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Extractor dispatching on file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<String, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => pdf_extract::extract_text_from_mem(bytes)
                .map(|text| join_pages(&text))
                .map_err(|e| ExtractionError::Pdf {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }),
            "txt" | "md" => String::from_utf8(bytes.to_vec()).map_err(|_| {
                ExtractionError::Unsupported(format!("{} is not valid UTF-8", path.display()))
            }),
            _ => Err(ExtractionError::Unsupported(path.display().to_string())),
        }
    }
}

/// Separate pages (form feeds in extracted PDF text) with a blank line.
fn join_pages(text: &str) -> String {
    text.split('\u{c}')
        .map(str::trim_end)
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extract and concatenate the text of every document, in order.
///
/// Each document's text is followed by a blank line. Nothing is returned
/// unless every document succeeds. `progress` is called with the 1-based
/// position and the total before each document is read. Decoding runs on
/// the blocking pool.
pub async fn extract_all<E, F>(
    extractor: &E,
    paths: &[PathBuf],
    mut progress: F,
) -> Result<String, ExtractionError>
where
    E: TextExtractor + Clone + 'static,
    F: FnMut(usize, usize, &Path),
{
    let total = paths.len();
    let mut full_text = String::new();

    for (idx, path) in paths.iter().enumerate() {
        tracing::info!("Reading {} / {}: {}", idx + 1, total, path.display());
        progress(idx + 1, total, path);

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractionError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let worker = extractor.clone();
        let owned = path.clone();
        let text = tokio::task::spawn_blocking(move || worker.extract(&owned, &bytes))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;
        full_text.push_str(text.trim_end());
        full_text.push_str("\n\n");
    }

    tracing::info!("Loaded {} document(s), {} characters", total, full_text.chars().count());
    Ok(full_text)
}
