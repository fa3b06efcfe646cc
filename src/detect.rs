//! PDF header sniffing.
//!
//! The layout engine is expensive to run, so input is rejected up front when
//! it does not even start like a PDF file.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// `%PDF-` followed by a `d.d` version.
const MAGIC: &[u8] = b"%PDF-";
const HEADER_LEN: usize = MAGIC.len() + 3;

/// Information read from the PDF file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// Declared PDF version, e.g. "1.7".
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Read the header of the file at `path`.
///
/// Files shorter than a header are reported as [`Error::UnknownFormat`]
/// rather than as an I/O error.
pub fn sniff_pdf<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut head = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut head)?;
    sniff_pdf_bytes(&head)
}

/// Parse a PDF header from the leading bytes of a file.
pub fn sniff_pdf_bytes(data: &[u8]) -> Result<PdfHeader> {
    if data.len() < HEADER_LEN || !data.starts_with(MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[MAGIC.len()..HEADER_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(PdfHeader {
                version: format!("{}.{}", *major as char, *minor as char),
            })
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Check whether the file at `path` looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    sniff_pdf(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_versions() {
        assert_eq!(sniff_pdf_bytes(b"%PDF-1.7\n%").unwrap().version, "1.7");
        assert_eq!(sniff_pdf_bytes(b"%PDF-2.0\n").unwrap().version, "2.0");
    }

    #[test]
    fn test_sniff_rejects_other_formats() {
        assert!(matches!(
            sniff_pdf_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(sniff_pdf_bytes(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(sniff_pdf_bytes(b""), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_bad_version() {
        assert!(matches!(
            sniff_pdf_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_sniff_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.pdf");
        std::fs::write(&path, b"%PD").unwrap();
        assert!(matches!(sniff_pdf(&path), Err(Error::UnknownFormat)));
        assert!(!is_pdf(&path));
    }
}
