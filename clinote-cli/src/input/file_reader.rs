//! Note file reading
//!
//! Notes are read as UTF-8. Files that are not valid UTF-8 are assumed to be
//! legacy Windows-1252 exports unless an explicit encoding is requested.

use crate::error::CliError;
use anyhow::{Context, Result};
use encoding_rs::{Encoding, WINDOWS_1252};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// How note bytes are decoded
#[derive(Debug, Clone, Copy, Default)]
pub enum TextEncoding {
    /// BOM if present, then UTF-8, then Windows-1252
    #[default]
    Auto,
    /// A fixed WHATWG encoding
    Fixed(&'static Encoding),
}

impl FromStr for TextEncoding {
    type Err = CliError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        if label.eq_ignore_ascii_case("auto") {
            return Ok(TextEncoding::Auto);
        }
        Encoding::for_label(label.as_bytes())
            .map(TextEncoding::Fixed)
            .ok_or_else(|| CliError::UnknownEncoding(label.to_string()))
    }
}

/// Decoded note text
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedNote {
    /// Note text
    pub text: String,
    /// Encoding that produced `text`
    pub encoding: &'static str,
    /// Whether undecodable bytes were replaced
    pub lossy: bool,
}

/// File reader with encoding detection
pub struct FileReader;

impl FileReader {
    /// Read a note, detecting its encoding
    pub fn read_note(path: &Path) -> Result<DecodedNote> {
        Self::read_note_as(path, TextEncoding::Auto)
    }

    /// Read a note with the given encoding policy
    pub fn read_note_as(path: &Path, encoding: TextEncoding) -> Result<DecodedNote> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        let note = Self::decode(&bytes, encoding);
        if note.lossy {
            log::warn!(
                "{}: undecodable bytes replaced while reading as {}",
                path.display(),
                note.encoding
            );
        }
        Ok(note)
    }

    /// Decode raw bytes
    pub fn decode(bytes: &[u8], encoding: TextEncoding) -> DecodedNote {
        let (encoding, body) = match encoding {
            TextEncoding::Fixed(encoding) => (encoding, bytes),
            TextEncoding::Auto => match Encoding::for_bom(bytes) {
                Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
                None => match std::str::from_utf8(bytes) {
                    Ok(text) => {
                        return DecodedNote {
                            text: text.to_string(),
                            encoding: "UTF-8",
                            lossy: false,
                        }
                    }
                    Err(_) => {
                        log::debug!("input is not UTF-8, decoding as windows-1252");
                        (WINDOWS_1252, bytes)
                    }
                },
            },
        };

        let (text, lossy) = encoding.decode_without_bom_handling(body);
        DecodedNote {
            text: text.into_owned(),
            encoding: encoding.name(),
            lossy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_read_utf8_note() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("note.txt");

        let content = "CHIEF COMPLAINT: chest pain\nTemp 37.2 °C";
        fs::write(&file_path, content).unwrap();

        let note = FileReader::read_note(&file_path).unwrap();
        assert_eq!(note.text, content);
        assert_eq!(note.encoding, "UTF-8");
        assert!(!note.lossy);
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "Temp 98.6°F" with 0xB0 as the degree sign
        let bytes = b"Temp 98.6\xB0F";
        let note = FileReader::decode(bytes, TextEncoding::Auto);
        assert_eq!(note.text, "Temp 98.6°F");
        assert_eq!(note.encoding, "windows-1252");
        assert!(!note.lossy);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Plan: follow up");
        let note = FileReader::decode(&bytes, TextEncoding::Auto);
        assert_eq!(note.text, "Plan: follow up");
    }

    #[test]
    fn test_fixed_encoding() {
        let encoding: TextEncoding = "latin1".parse().unwrap();
        let note = FileReader::decode(b"caf\xE9", encoding);
        assert_eq!(note.text, "café");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = "klingon".parse::<TextEncoding>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown encoding: klingon");
        assert!(matches!("AUTO".parse::<TextEncoding>(), Ok(TextEncoding::Auto)));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let path = Path::new("/nonexistent/note.txt");
        let err = FileReader::read_note(path).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        File::create(&file_path).unwrap();

        let note = FileReader::read_note(&file_path).unwrap();
        assert_eq!(note.text, "");
    }
}
