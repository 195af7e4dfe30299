//! Input normalization.
//!
//! Callers hand the pipeline a single source string that may be a remote
//! PDF, an HTML page, a local PDF, a local text file or the article text
//! itself. This module classifies the source and returns extracted plain
//! text, or a descriptive error. Untrusted input is validated here, before
//! any token is spent on it.

pub mod html;
pub mod pdf;

pub use pdf::PdfError;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// User agent sent on every outbound fetch.
const USER_AGENT: &str = "Mozilla/5.0";

const PDF_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const HTML_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Minimum stripped length accepted for raw-text input.
const MIN_RAW_TEXT_CHARS: usize = 20;
/// Minimum stripped length accepted for a local text file.
const MIN_FILE_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input text too short to analyze ({0} chars)")]
    TooShort(usize),

    #[error("file has no usable text: {0}")]
    EmptyFile(PathBuf),

    #[error("PDF file not found: {0}")]
    MissingPdf(PathBuf),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("URL fetch failed: {0}")]
    Url(String),

    #[error("URL returned too little usable content: {0}")]
    ThinPage(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, InputError>;

/// How a source string will be interpreted. First match wins, in the order
/// the variants are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `http…*.pdf` (case-insensitive).
    RemotePdf,
    /// Any other `http://` or `https://` URL.
    RemoteHtml,
    /// A non-URL source ending in `.pdf`. The path may not exist; that is
    /// reported as an error rather than falling through to raw text.
    LocalPdf,
    /// Any other existing local file.
    LocalFile,
    /// Treated as the article text itself.
    RawText,
}

/// Classifies a trimmed source string.
///
/// Checks the filesystem only for the local-file variant; everything else
/// is decided from the string alone.
pub fn classify_source(source: &str) -> SourceKind {
    let lower = source.to_lowercase();

    if lower.starts_with("http") && lower.ends_with(".pdf") {
        return SourceKind::RemotePdf;
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return SourceKind::RemoteHtml;
    }
    if lower.ends_with(".pdf") {
        return SourceKind::LocalPdf;
    }
    if Path::new(source).is_file() {
        return SourceKind::LocalFile;
    }
    SourceKind::RawText
}

/// Resolves a source string into extracted plain text.
///
/// Network and HTTP status failures surface as a single [`InputError::Url`];
/// nothing propagates raw out of this module.
pub async fn process_input(source: &str) -> Result<String> {
    let source = source.trim();
    let kind = classify_source(source);
    debug!(?kind, "classified input source");

    match kind {
        SourceKind::RemotePdf => read_remote_pdf(source).await,
        SourceKind::RemoteHtml => read_url(source).await,
        SourceKind::LocalPdf => {
            let path = PathBuf::from(source);
            if !path.exists() {
                return Err(InputError::MissingPdf(path));
            }
            let text = tokio::task::spawn_blocking(move || pdf::extract_pdf_file(&path))
                .await
                .map_err(|e| PdfError::Extract(e.to_string()))??;
            Ok(text)
        }
        SourceKind::LocalFile => {
            let path = PathBuf::from(source);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| InputError::Io {
                    path: path.clone(),
                    source,
                })?;
            if content.trim().chars().count() < MIN_FILE_CHARS {
                return Err(InputError::EmptyFile(path));
            }
            Ok(content)
        }
        SourceKind::RawText => {
            let len = source.chars().count();
            if len < MIN_RAW_TEXT_CHARS {
                return Err(InputError::TooShort(len));
            }
            Ok(source.to_string())
        }
    }
}

/// Downloads a remote PDF into a scoped temporary file and extracts its
/// text. The temporary file is removed on every exit path.
async fn read_remote_pdf(url: &str) -> Result<String> {
    info!(url, "downloading remote PDF");

    let bytes = fetch_bytes(url, PDF_DOWNLOAD_TIMEOUT).await?;

    let text = tokio::task::spawn_blocking(move || -> Result<String> {
        let mut temp = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| PdfError::Extract(e.to_string()))?;
        temp.write_all(&bytes)
            .map_err(|e| PdfError::Extract(e.to_string()))?;
        // `temp` is dropped (and unlinked) whether extraction succeeds or not.
        Ok(pdf::extract_pdf_file(temp.path())?)
    })
    .await
    .map_err(|e| PdfError::Extract(e.to_string()))??;

    Ok(text)
}

/// Fetches an HTML page and extracts its readable text.
async fn read_url(url: &str) -> Result<String> {
    info!(url, "fetching HTML page");

    let bytes = fetch_bytes(url, HTML_FETCH_TIMEOUT).await?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    let text = html::extract_readable_text(&body);
    if text.chars().count() < html::MIN_PAGE_CHARS {
        return Err(InputError::ThinPage(url.to_string()));
    }
    Ok(text)
}

async fn fetch_bytes(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| InputError::Url(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| InputError::Url(e.to_string()))?
        .error_for_status()
        .map_err(|e| InputError::Url(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| InputError::Url(e.to_string()))?;

    Ok(bytes.to_vec())
}
