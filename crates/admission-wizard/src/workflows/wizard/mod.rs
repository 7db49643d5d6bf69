//! Admission fee wizard: Search → Results → Invoice → Success.
//!
//! [`WizardController`] owns the section state machine, the receipt
//! attachment gate and the notification layer. Rendering is delegated to a
//! [`Presenter`]; simulated delays run on a [`Timeline`] driven by an
//! injectable [`Clock`] so tests can advance virtual time.

pub mod attachment;
pub mod confetti;
mod controller;
pub mod directory;
pub mod domain;
mod error;
pub mod notifications;
pub mod presenter;
pub mod router;
mod sections;
mod snapshot;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use attachment::{AttachmentGate, ACCEPTED_RECEIPT_TYPES};
pub use confetti::{BurstId, ConfettiBurst, ConfettiPiece};
pub use controller::{
    IgnoredReason, Outcome, PendingOperation, WizardController, WizardEvent, PRINT_CHROME_RESTORE,
};
pub use directory::{DirectoryImportError, RecordDirectory};
pub use domain::{
    AlertSeverity, EntryMarker, InvoiceDocument, SearchQuery, StudentRecord, UploadedFile,
    WizardView,
};
pub use error::WizardError;
pub use notifications::{Alert, AlertId, NotificationCenter};
pub use presenter::{Presenter, TracingPresenter, ViewFrame};
pub use router::{wizard_router, SharedWizard};
pub use sections::{SectionBoard, SectionState};
pub use snapshot::{AlertView, WizardSnapshot};
pub use timeline::{Clock, ManualClock, SystemClock, Timeline};
