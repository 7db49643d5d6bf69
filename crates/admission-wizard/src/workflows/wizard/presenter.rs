use serde::Serialize;
use tracing::{debug, info};

use super::confetti::{BurstId, ConfettiBurst};
use super::domain::{EntryMarker, InvoiceDocument, StudentRecord, UploadedFile, WizardView};
use super::notifications::{Alert, AlertId};

/// What the presentation layer needs to draw the active section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewFrame {
    pub view: WizardView,
    pub entry: Option<EntryMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<StudentRecord>,
}

/// Output port implemented by concrete UI layers. The controller never
/// touches a rendering surface directly; every visible effect goes through
/// one of these calls.
pub trait Presenter: Send {
    /// Show `frame.view` and hide every other section.
    fn render(&mut self, frame: &ViewFrame);
    fn notify(&mut self, alert: &Alert);
    fn dismiss(&mut self, id: AlertId);
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    /// `None` restores the upload prompt and disables payment submission.
    fn attachment_changed(&mut self, attached: Option<&UploadedFile>);
    fn highlight_drop_zone(&mut self, active: bool);
    fn open_file_picker(&mut self);
    fn reset_search_form(&mut self);
    fn print(&mut self, invoice: &InvoiceDocument);
    /// Buttons and the upload section are hidden while printing.
    fn set_chrome_visible(&mut self, visible: bool);
    fn celebrate(&mut self, burst: &ConfettiBurst);
    fn clear_confetti(&mut self, id: BurstId);
}

/// Presenter for headless runs: every effect becomes a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn render(&mut self, frame: &ViewFrame) {
        info!(view = frame.view.label(), entry = ?frame.entry, "section shown");
    }

    fn notify(&mut self, alert: &Alert) {
        info!(
            alert = alert.id.0,
            severity = alert.severity.label(),
            message = %alert.message,
            "alert raised"
        );
    }

    fn dismiss(&mut self, id: AlertId) {
        debug!(alert = id.0, "alert removed");
    }

    fn show_busy(&mut self) {
        debug!("loading overlay shown");
    }

    fn hide_busy(&mut self) {
        debug!("loading overlay hidden");
    }

    fn attachment_changed(&mut self, attached: Option<&UploadedFile>) {
        match attached {
            Some(file) => info!(file = %file.name, bytes = file.size_bytes, "receipt attached"),
            None => info!("receipt cleared"),
        }
    }

    fn highlight_drop_zone(&mut self, active: bool) {
        debug!(active, "drop zone highlight");
    }

    fn open_file_picker(&mut self) {
        debug!("file picker requested");
    }

    fn reset_search_form(&mut self) {
        debug!("search form reset");
    }

    fn print(&mut self, invoice: &InvoiceDocument) {
        info!(
            application = %invoice.application_number,
            issued_on = %invoice.issued_on,
            "invoice sent to printer"
        );
    }

    fn set_chrome_visible(&mut self, visible: bool) {
        debug!(visible, "page chrome visibility");
    }

    fn celebrate(&mut self, burst: &ConfettiBurst) {
        debug!(burst = burst.id.0, pieces = burst.pieces.len(), "confetti");
    }

    fn clear_confetti(&mut self, id: BurstId) {
        debug!(burst = id.0, "confetti cleared");
    }
}
