use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::WizardConfig;
use crate::workflows::wizard::confetti::{BurstId, ConfettiBurst};
use crate::workflows::wizard::domain::{InvoiceDocument, UploadedFile, WizardView};
use crate::workflows::wizard::notifications::{Alert, AlertId};
use crate::workflows::wizard::presenter::{Presenter, ViewFrame};
use crate::workflows::wizard::timeline::ManualClock;
use crate::workflows::wizard::{Outcome, RecordDirectory, WizardController, WizardEvent};

pub(super) const KNOWN_ID: &str = "1140959790";
pub(super) const KNOWN_APPLICATION: &str = "TR2024001";

#[derive(Debug, Clone, PartialEq)]
pub(super) enum PresenterCall {
    Render(ViewFrame),
    Notify(Alert),
    Dismiss(AlertId),
    ShowBusy,
    HideBusy,
    Attachment(Option<UploadedFile>),
    Highlight(bool),
    OpenPicker,
    ResetForm,
    Print(InvoiceDocument),
    Chrome(bool),
    Celebrate(usize),
    ClearConfetti(BurstId),
}

#[derive(Default, Clone)]
pub(super) struct RecordingPresenter {
    calls: Arc<Mutex<Vec<PresenterCall>>>,
}

impl RecordingPresenter {
    pub(super) fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().expect("presenter mutex poisoned").clone()
    }

    pub(super) fn rendered_views(&self) -> Vec<WizardView> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PresenterCall::Render(frame) => Some(frame.view),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PresenterCall) {
        self.calls.lock().expect("presenter mutex poisoned").push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, frame: &ViewFrame) {
        self.record(PresenterCall::Render(frame.clone()));
    }

    fn notify(&mut self, alert: &Alert) {
        self.record(PresenterCall::Notify(alert.clone()));
    }

    fn dismiss(&mut self, id: AlertId) {
        self.record(PresenterCall::Dismiss(id));
    }

    fn show_busy(&mut self) {
        self.record(PresenterCall::ShowBusy);
    }

    fn hide_busy(&mut self) {
        self.record(PresenterCall::HideBusy);
    }

    fn attachment_changed(&mut self, attached: Option<&UploadedFile>) {
        self.record(PresenterCall::Attachment(attached.cloned()));
    }

    fn highlight_drop_zone(&mut self, active: bool) {
        self.record(PresenterCall::Highlight(active));
    }

    fn open_file_picker(&mut self) {
        self.record(PresenterCall::OpenPicker);
    }

    fn reset_search_form(&mut self) {
        self.record(PresenterCall::ResetForm);
    }

    fn print(&mut self, invoice: &InvoiceDocument) {
        self.record(PresenterCall::Print(invoice.clone()));
    }

    fn set_chrome_visible(&mut self, visible: bool) {
        self.record(PresenterCall::Chrome(visible));
    }

    fn celebrate(&mut self, burst: &ConfettiBurst) {
        self.record(PresenterCall::Celebrate(burst.pieces.len()));
    }

    fn clear_confetti(&mut self, id: BurstId) {
        self.record(PresenterCall::ClearConfetti(id));
    }
}

pub(super) type TestWizard = WizardController<ManualClock, RecordingPresenter>;

pub(super) struct Harness {
    pub(super) clock: Arc<ManualClock>,
    pub(super) presenter: RecordingPresenter,
    pub(super) wizard: TestWizard,
}

impl Harness {
    pub(super) fn advance(&mut self, millis: u64) -> usize {
        self.clock.advance(Duration::from_millis(millis));
        self.wizard.tick()
    }

    pub(super) fn search(&mut self, student_id: &str, application_number: &str) -> Outcome {
        self.wizard
            .handle(WizardEvent::SubmitSearch {
                student_id: student_id.to_string(),
                application_number: application_number.to_string(),
            })
            .expect("search accepted")
    }

    /// Known applicant found and invoice shown.
    pub(super) fn reach_invoice(&mut self) {
        self.search(KNOWN_ID, KNOWN_APPLICATION);
        self.advance(1_500);
        assert_eq!(self.wizard.view(), WizardView::Results);
        self.wizard
            .handle(WizardEvent::ShowInvoice)
            .expect("invoice shown");
        assert_eq!(self.wizard.view(), WizardView::Invoice);
    }

    pub(super) fn reach_success(&mut self) {
        self.reach_invoice();
        self.wizard
            .handle(WizardEvent::FileSelected {
                file: Some(pdf_receipt()),
            })
            .expect("receipt accepted");
        self.wizard
            .handle(WizardEvent::SubmitPayment)
            .expect("payment scheduled");
        self.advance(2_000);
        assert_eq!(self.wizard.view(), WizardView::Success);
    }
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date")
}

pub(super) fn wizard_config() -> WizardConfig {
    WizardConfig {
        confetti_seed: Some(42),
        ..WizardConfig::default()
    }
}

pub(super) fn harness() -> Harness {
    harness_with(wizard_config())
}

pub(super) fn harness_with(config: WizardConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(today()));
    let presenter = RecordingPresenter::default();
    let wizard = WizardController::new(
        clock.clone(),
        presenter.clone(),
        Arc::new(RecordDirectory::standard()),
        config,
    );

    Harness {
        clock,
        presenter,
        wizard,
    }
}

pub(super) fn pdf_receipt() -> UploadedFile {
    UploadedFile {
        name: "receipt.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size_bytes: 120_000,
    }
}

pub(super) fn upload(name: &str, mime_type: &str, size_bytes: u64) -> UploadedFile {
    UploadedFile {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size_bytes,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
