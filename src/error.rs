//! Error types for the pdf2blocks library.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2blocks operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning a PDF into blocks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF is encrypted and cannot be opened.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The layout analysis engine failed.
    #[error("Layout engine error: {0}")]
    LayoutEngine(String),

    /// The layout engine produced output that could not be decoded.
    #[error("Invalid layout data: {0}")]
    LayoutFormat(#[from] serde_json::Error),

    /// Rendering a page region failed.
    #[error("Rasterization error: {0}")]
    Rasterize(String),

    /// Encoding or writing a crop image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error while rendering the result (JSON, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::LayoutEngine("model not loaded".into());
        assert_eq!(err.to_string(), "Layout engine error: model not loaded");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::LayoutFormat(_)));
    }
}
