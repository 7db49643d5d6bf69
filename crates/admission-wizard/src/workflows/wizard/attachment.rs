use mime::Mime;

use super::domain::UploadedFile;
use super::error::WizardError;

/// Receipt formats accepted by the upload area.
pub const ACCEPTED_RECEIPT_TYPES: [Mime; 4] = [
    mime::IMAGE_JPEG,
    mime::IMAGE_PNG,
    mime::IMAGE_GIF,
    mime::APPLICATION_PDF,
];

/// Holds at most one receipt; payment submission is unlocked while it does.
#[derive(Debug, Clone)]
pub struct AttachmentGate {
    attached: Option<UploadedFile>,
    max_bytes: u64,
}

impl AttachmentGate {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            attached: None,
            max_bytes,
        }
    }

    /// Type is checked before size. A rejected file leaves the gate untouched.
    pub fn accept(&mut self, file: UploadedFile) -> Result<&UploadedFile, WizardError> {
        if !is_accepted_type(&file.mime_type) {
            return Err(WizardError::UnsupportedType {
                mime_type: file.mime_type,
            });
        }

        if file.size_bytes > self.max_bytes {
            return Err(WizardError::FileTooLarge {
                size_bytes: file.size_bytes,
                limit_bytes: self.max_bytes,
            });
        }

        Ok(self.attached.insert(file))
    }

    pub fn clear(&mut self) -> Option<UploadedFile> {
        self.attached.take()
    }

    pub fn attached(&self) -> Option<&UploadedFile> {
        self.attached.as_ref()
    }

    pub fn is_unlocked(&self) -> bool {
        self.attached.is_some()
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

/// Exact match against the accepted list; no trimming, case folding or parameters.
fn is_accepted_type(raw: &str) -> bool {
    ACCEPTED_RECEIPT_TYPES
        .iter()
        .any(|accepted| accepted.as_ref() == raw)
}
