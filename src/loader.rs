//! Reading export files.
//!
//! Exports mix text with binary blobs, so decoding is one character per byte
//! (Latin-1): it cannot fail and loses nothing. Non-ASCII text encoded as
//! multi-byte UTF-8 comes out mangled, which the extractor tolerates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read an export file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error analyzing file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Read {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Map every byte to the char with the same code point.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&b| char::from(b)).collect()
}

/// Read and decode a whole export. The file handle is closed before return.
pub fn load_export(path: &Path) -> Result<String, LoadError> {
    let data = fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
    tracing::debug!("load_export: read {} bytes from {}", data.len(), path.display());
    Ok(decode_latin1(&data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_every_byte() {
        let data: Vec<u8> = (0u8..=255).collect();
        let text = decode_latin1(&data);
        assert_eq!(text.chars().count(), 256);
        for (i, c) in text.chars().enumerate() {
            assert_eq!(c as u32, i as u32);
        }
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let text = decode_latin1(&[b'o', b'k', 0xff, 0xfe, 0xc3]);
        assert_eq!(text, "ok\u{ff}\u{fe}\u{c3}");
    }

    #[test]
    fn test_decode_multibyte_is_mangled_not_lost() {
        // "é" in UTF-8 is two bytes, so it decodes to two chars
        let text = decode_latin1("é".as_bytes());
        assert_eq!(text.chars().count(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_export(Path::new("/nonexistent/hive/export.ave")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().starts_with("File not found:"));
    }

    #[test]
    fn test_directory_is_read_error() {
        let err = load_export(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
