use crate::error::ValidationError;
use crate::validation::{format_file_size, validate_file, FileType};

/// A file the user picked or dropped.
pub trait PickedFile {
    fn name(&self) -> String;
    fn size(&self) -> u64;
    /// Declared MIME type; empty when the platform reports none.
    fn mime_type(&self) -> String;
}

/// Owned file contents, for hosts without a browser file handle.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl PickedFile for MemoryFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }
}

/// Upload widget state. Only `Ready` can be submitted; a rejected pick
/// keeps the name for display but no file handle.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState<F> {
    Empty,
    Ready { file: F, file_type: FileType },
    Rejected { name: String },
    Submitting { file: F, file_type: FileType },
}

impl<F> Default for UploadState<F> {
    fn default() -> Self {
        UploadState::Empty
    }
}

/// Outcome of handing a new file to the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Accepted(FileType),
    Rejected(ValidationError),
    Busy,
}

impl<F: PickedFile + Clone> UploadState<F> {
    /// Replaces whatever was selected. Ignored while an upload is in flight.
    pub fn select(&mut self, file: F) -> Selection {
        if self.is_submitting() {
            return Selection::Busy;
        }
        match validate_file(&file.name(), &file.mime_type()) {
            Ok(file_type) => {
                *self = UploadState::Ready { file, file_type };
                Selection::Accepted(file_type)
            }
            Err(err) => {
                *self = UploadState::Rejected { name: file.name() };
                Selection::Rejected(err)
            }
        }
    }

    /// Moves `Ready` to `Submitting` and hands back the file to send.
    pub fn begin_submit(&mut self) -> Result<F, ValidationError> {
        match std::mem::take(self) {
            UploadState::Ready { file, file_type } => {
                let outgoing = file.clone();
                *self = UploadState::Submitting { file, file_type };
                Ok(outgoing)
            }
            other => {
                *self = other;
                Err(ValidationError::NoFileSelected)
            }
        }
    }

    /// Success empties the widget, failure puts the file back for a retry.
    pub fn finish_submit(&mut self, succeeded: bool) {
        match std::mem::take(self) {
            UploadState::Submitting { file, file_type } if !succeeded => {
                *self = UploadState::Ready { file, file_type };
            }
            UploadState::Submitting { .. } => {}
            other => *self = other,
        }
    }

    pub fn reset(&mut self) {
        *self = UploadState::Empty;
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, UploadState::Submitting { .. })
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, UploadState::Ready { .. })
    }

    pub fn view(&self) -> UploadView {
        match self {
            UploadState::Empty => UploadView::Idle,
            UploadState::Ready { file, .. } => UploadView::Ready {
                name: file.name(),
                size: format_file_size(file.size()),
            },
            UploadState::Rejected { name } => UploadView::Rejected { name: name.clone() },
            UploadState::Submitting { file, .. } => UploadView::Submitting { name: file.name() },
        }
    }
}

/// What the drop area shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadView {
    #[default]
    Idle,
    Ready { name: String, size: String },
    Rejected { name: String },
    Submitting { name: String },
}

impl UploadView {
    pub fn submit_enabled(&self) -> bool {
        matches!(self, UploadView::Ready { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::DOCX_MIME;

    fn docx() -> MemoryFile {
        MemoryFile::new("memo.docx", DOCX_MIME, vec![0; 1536])
    }

    fn pdf() -> MemoryFile {
        MemoryFile::new("scan.pdf", "application/pdf", vec![0; 10])
    }

    #[test]
    fn valid_pick_enables_submit() {
        let mut state = UploadState::default();
        assert_eq!(state.select(docx()), Selection::Accepted(FileType::Docx));
        assert!(state.can_submit());
        assert_eq!(
            state.view(),
            UploadView::Ready {
                name: "memo.docx".into(),
                size: "1.5 KB".into()
            }
        );
        assert!(state.view().submit_enabled());
    }

    #[test]
    fn invalid_pick_drops_previous_file() {
        let mut state = UploadState::default();
        state.select(docx());
        assert_eq!(
            state.select(pdf()),
            Selection::Rejected(ValidationError::UnsupportedFileType)
        );
        assert!(!state.can_submit());
        assert!(!state.view().submit_enabled());
        assert_eq!(state.begin_submit(), Err(ValidationError::NoFileSelected));
    }

    #[test]
    fn failed_submit_keeps_file_for_retry() {
        let mut state = UploadState::default();
        state.select(docx());
        assert_eq!(state.begin_submit(), Ok(docx()));
        assert!(state.is_submitting());
        state.finish_submit(false);
        assert!(state.can_submit());
    }

    #[test]
    fn successful_submit_empties() {
        let mut state = UploadState::default();
        state.select(docx());
        state.begin_submit().unwrap();
        state.finish_submit(true);
        assert_eq!(state, UploadState::Empty);
    }

    #[test]
    fn no_second_submit_or_pick_while_in_flight() {
        let mut state = UploadState::default();
        state.select(docx());
        state.begin_submit().unwrap();
        assert_eq!(state.begin_submit(), Err(ValidationError::NoFileSelected));
        assert!(state.is_submitting());
        assert_eq!(state.select(pdf()), Selection::Busy);
        assert!(state.is_submitting());
    }
}
