// src/filesystem/encoding.rs
//!
//! Text encodings accepted by `read_file` / `write_file`

use std::str::FromStr;

use crate::filesystem::error::ErrorKind;

/// Bytes inspected when sniffing for binary content
const BINARY_SNIFF_LEN: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl FromStr for Encoding {
    type Err = ErrorKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" | "binary" => Ok(Encoding::Latin1),
            _ => Err(ErrorKind::UnsupportedEncoding),
        }
    }
}

impl Encoding {
    pub fn decode(&self, bytes: &[u8]) -> Result<String, ErrorKind> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|_| ErrorKind::UnsupportedEncoding)
            }
            Encoding::Ascii => {
                if bytes.is_ascii() {
                    Ok(bytes.iter().map(|&b| b as char).collect())
                } else {
                    Err(ErrorKind::UnsupportedEncoding)
                }
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>, ErrorKind> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Ascii => {
                if text.is_ascii() {
                    Ok(text.as_bytes().to_vec())
                } else {
                    Err(ErrorKind::UnsupportedEncoding)
                }
            }
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| ErrorKind::UnsupportedEncoding))
                .collect(),
        }
    }
}

/// A NUL byte near the start of the content marks it as binary
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    sniff.contains(&0)
}
