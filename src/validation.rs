use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Office Open XML formats the portal accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pptx,
    Docx,
    Xlsx,
    #[serde(other)]
    Unknown,
}

impl FileType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            PPTX_MIME => Some(FileType::Pptx),
            DOCX_MIME => Some(FileType::Docx),
            XLSX_MIME => Some(FileType::Xlsx),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        // Same rule as the API's upload check: a name with no dot has no extension.
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_lowercase().as_str() {
            "pptx" => Some(FileType::Pptx),
            "docx" => Some(FileType::Docx),
            "xlsx" => Some(FileType::Xlsx),
            _ => None,
        }
    }

    /// Font Awesome class for list rows.
    pub fn icon(&self) -> &'static str {
        match self {
            FileType::Pptx => "fa-file-powerpoint",
            FileType::Docx => "fa-file-word",
            FileType::Xlsx => "fa-file-excel",
            FileType::Unknown => "fa-file",
        }
    }
}

/// Accepts a file when either its declared MIME type or its extension is
/// one of the three office formats. Browsers often report these documents
/// as `application/octet-stream` or an empty type, so the extension alone
/// is enough.
pub fn validate_file(name: &str, mime: &str) -> Result<FileType, ValidationError> {
    FileType::from_mime(mime)
        .or_else(|| FileType::from_filename(name))
        .ok_or(ValidationError::UnsupportedFileType)
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let rounded = format!("{:.2}", size);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit_index])
}
