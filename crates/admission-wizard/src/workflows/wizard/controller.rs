use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::attachment::AttachmentGate;
use super::confetti::{BurstId, ConfettiBurst};
use super::directory::RecordDirectory;
use super::domain::{
    AlertSeverity, InvoiceDocument, SearchQuery, StudentRecord, UploadedFile, WizardView,
};
use super::error::WizardError;
use super::notifications::{Alert, AlertId, NotificationCenter};
use super::presenter::{Presenter, ViewFrame};
use super::sections::{SectionBoard, SectionState};
use super::timeline::{Clock, Timeline};
use crate::config::WizardConfig;

/// How long page chrome stays hidden after a print request.
pub const PRINT_CHROME_RESTORE: Duration = Duration::from_millis(1_000);

/// Discrete input coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardEvent {
    SubmitSearch {
        student_id: String,
        application_number: String,
    },
    ShowInvoice,
    UploadAreaClicked,
    DragOver,
    Drop {
        #[serde(default)]
        files: Vec<UploadedFile>,
    },
    FileSelected {
        #[serde(default)]
        file: Option<UploadedFile>,
    },
    RemoveFile,
    SubmitPayment,
    PrintInvoice,
    StartNewSearch,
    DismissAlert {
        id: AlertId,
    },
}

impl WizardEvent {
    /// The section whose controls raise this event; `None` means any section.
    pub fn required_view(&self) -> Option<WizardView> {
        match self {
            WizardEvent::SubmitSearch { .. } => Some(WizardView::Search),
            WizardEvent::ShowInvoice => Some(WizardView::Results),
            WizardEvent::UploadAreaClicked
            | WizardEvent::DragOver
            | WizardEvent::Drop { .. }
            | WizardEvent::FileSelected { .. }
            | WizardEvent::RemoveFile
            | WizardEvent::SubmitPayment
            | WizardEvent::PrintInvoice => Some(WizardView::Invoice),
            WizardEvent::StartNewSearch | WizardEvent::DismissAlert { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    Lookup,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    /// The loading overlay is blocking input.
    Busy,
    /// The control that raises the event is not on the visible section.
    Unavailable,
}

/// Result of a handled event. Errors are returned separately as
/// [`WizardError`] after being shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Entered { view: WizardView },
    Pending { operation: PendingOperation },
    Updated,
    Unchanged,
    Ignored { reason: IgnoredReason },
}

#[derive(Debug)]
enum Deferred {
    CompleteLookup(SearchQuery),
    CompletePayment,
    ExpireAlert(AlertId),
    ClearConfetti(BurstId),
    RestoreChrome,
}

/// Owns the wizard state machine and its two gates (receipt attachment and
/// the notification layer). Simulated delays are queued on a timeline and
/// only run from [`WizardController::tick`].
pub struct WizardController<C, P> {
    clock: Arc<C>,
    presenter: P,
    directory: Arc<RecordDirectory>,
    config: WizardConfig,
    sections: SectionBoard,
    gate: AttachmentGate,
    notifications: NotificationCenter,
    timeline: Timeline<Deferred>,
    query: Option<SearchQuery>,
    record: Option<StudentRecord>,
    rng: StdRng,
    next_burst: u64,
    confetti: Vec<BurstId>,
    chrome_visible: bool,
    drop_zone_active: bool,
}

impl<C, P> WizardController<C, P>
where
    C: Clock,
    P: Presenter,
{
    pub fn new(
        clock: Arc<C>,
        presenter: P,
        directory: Arc<RecordDirectory>,
        config: WizardConfig,
    ) -> Self {
        let rng = match config.confetti_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let gate = AttachmentGate::new(config.max_upload_bytes);

        let mut controller = Self {
            clock,
            presenter,
            directory,
            config,
            sections: SectionBoard::new(),
            gate,
            notifications: NotificationCenter::new(),
            timeline: Timeline::new(),
            query: None,
            record: None,
            rng,
            next_burst: 0,
            confetti: Vec::new(),
            chrome_visible: true,
            drop_zone_active: false,
        };
        controller.enter(WizardView::Search);
        controller
    }

    /// Entry point for UI events. Applies the modal-overlay and
    /// visible-section guards before dispatching.
    pub fn handle(&mut self, event: WizardEvent) -> Result<Outcome, WizardError> {
        if let WizardEvent::DismissAlert { id } = event {
            return Ok(self.dismiss_alert(id));
        }

        if self.notifications.is_busy() {
            debug!(?event, "input ignored while the loading overlay is shown");
            return Ok(Outcome::Ignored {
                reason: IgnoredReason::Busy,
            });
        }

        if let Some(required) = event.required_view() {
            let active = self.sections.active();
            if required != active {
                debug!(
                    ?event,
                    active = active.label(),
                    "input ignored; control is not on the visible section"
                );
                return Ok(Outcome::Ignored {
                    reason: IgnoredReason::Unavailable,
                });
            }
        }

        match event {
            WizardEvent::SubmitSearch {
                student_id,
                application_number,
            } => self.validate_and_search(&student_id, &application_number),
            WizardEvent::ShowInvoice => Ok(self.show_invoice()),
            WizardEvent::UploadAreaClicked => Ok(self.open_file_picker()),
            WizardEvent::DragOver => Ok(self.drag_over()),
            WizardEvent::Drop { files } => self.drop_files(files),
            WizardEvent::FileSelected { file } => self.select_file(file),
            WizardEvent::RemoveFile => Ok(self.remove_file()),
            WizardEvent::SubmitPayment => self.submit_payment(),
            WizardEvent::PrintInvoice => Ok(self.print_invoice()),
            WizardEvent::StartNewSearch => Ok(self.start_new_search()),
            WizardEvent::DismissAlert { id } => Ok(self.dismiss_alert(id)),
        }
    }

    /// Run every deferred callback that is due. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(action) = self.timeline.pop_due(now) {
            self.run_deferred(action);
            fired += 1;
        }
        fired
    }

    /// Trim both identifiers and, when both are present, schedule the lookup.
    pub fn validate_and_search(
        &mut self,
        student_id: &str,
        application_number: &str,
    ) -> Result<Outcome, WizardError> {
        let query = SearchQuery::new(student_id, application_number);
        if !query.is_complete() {
            return Err(self.reject(WizardError::Validation));
        }

        info!(student_id = %query.student_id, "record lookup scheduled");
        self.query = Some(query.clone());
        self.show_loading();
        let due = self.clock.now() + self.config.lookup_delay;
        self.timeline.schedule(due, Deferred::CompleteLookup(query));

        Ok(Outcome::Pending {
            operation: PendingOperation::Lookup,
        })
    }

    pub fn show_invoice(&mut self) -> Outcome {
        self.enter(WizardView::Invoice)
    }

    pub fn open_file_picker(&mut self) -> Outcome {
        self.presenter.open_file_picker();
        Outcome::Updated
    }

    pub fn drag_over(&mut self) -> Outcome {
        self.drop_zone_active = true;
        self.presenter.highlight_drop_zone(true);
        Outcome::Updated
    }

    /// Only the first dropped file is considered.
    pub fn drop_files(&mut self, files: Vec<UploadedFile>) -> Result<Outcome, WizardError> {
        self.drop_zone_active = false;
        self.presenter.highlight_drop_zone(false);

        match files.into_iter().next() {
            Some(file) => self.handle_file(file),
            None => Ok(Outcome::Updated),
        }
    }

    pub fn select_file(&mut self, file: Option<UploadedFile>) -> Result<Outcome, WizardError> {
        match file {
            Some(file) => self.handle_file(file),
            None => Ok(Outcome::Unchanged),
        }
    }

    /// Validate a receipt and, when accepted, unlock payment submission.
    pub fn handle_file(&mut self, file: UploadedFile) -> Result<Outcome, WizardError> {
        let accepted = self.gate.accept(file).cloned();

        match accepted {
            Ok(attached) => {
                info!(
                    file = %attached.name,
                    mime_type = %attached.mime_type,
                    bytes = attached.size_bytes,
                    "receipt accepted"
                );
                self.presenter.attachment_changed(Some(&attached));
                Ok(Outcome::Updated)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    pub fn remove_file(&mut self) -> Outcome {
        if let Some(removed) = self.gate.clear() {
            info!(file = %removed.name, "receipt removed");
        }
        self.presenter.attachment_changed(None);
        Outcome::Updated
    }

    pub fn submit_payment(&mut self) -> Result<Outcome, WizardError> {
        if !self.gate.is_unlocked() {
            return Err(self.reject(WizardError::NoAttachment));
        }

        info!("payment submission scheduled");
        self.show_loading();
        let due = self.clock.now() + self.config.payment_delay;
        self.timeline.schedule(due, Deferred::CompletePayment);

        Ok(Outcome::Pending {
            operation: PendingOperation::Payment,
        })
    }

    /// Hide the page chrome, print the invoice and restore the chrome shortly after.
    pub fn print_invoice(&mut self) -> Outcome {
        let Some(record) = self.record.as_ref() else {
            warn!("print requested without a matched record");
            return Outcome::Unchanged;
        };

        let invoice = InvoiceDocument::for_record(record, self.clock.today());
        self.chrome_visible = false;
        self.presenter.set_chrome_visible(false);
        self.presenter.print(&invoice);
        let due = self.clock.now() + PRINT_CHROME_RESTORE;
        self.timeline.schedule(due, Deferred::RestoreChrome);
        Outcome::Updated
    }

    pub fn start_new_search(&mut self) -> Outcome {
        self.query = None;
        self.record = None;
        self.presenter.reset_search_form();
        self.remove_file();
        self.enter(WizardView::Search)
    }

    pub fn show_alert(&mut self, message: impl Into<String>, severity: AlertSeverity) -> AlertId {
        let expires_at = self.clock.now() + self.config.alert_timeout;
        let alert = self
            .notifications
            .push(message, severity, expires_at)
            .clone();
        self.presenter.notify(&alert);
        self.timeline
            .schedule(expires_at, Deferred::ExpireAlert(alert.id));
        alert.id
    }

    pub fn dismiss_alert(&mut self, id: AlertId) -> Outcome {
        match self.notifications.dismiss(id) {
            Some(_) => {
                self.presenter.dismiss(id);
                Outcome::Updated
            }
            None => Outcome::Unchanged,
        }
    }

    pub fn show_loading(&mut self) {
        self.notifications.show_loading();
        self.presenter.show_busy();
    }

    pub fn hide_loading(&mut self) {
        if self.notifications.hide_loading() {
            self.presenter.hide_busy();
        }
    }

    pub fn view(&self) -> WizardView {
        self.sections.active()
    }

    pub fn visible_views(&self) -> Vec<WizardView> {
        self.sections.visible()
    }

    pub fn sections(&self) -> &[SectionState] {
        self.sections.sections()
    }

    pub fn alerts(&self) -> &[Alert] {
        self.notifications.alerts()
    }

    pub fn is_busy(&self) -> bool {
        self.notifications.is_busy()
    }

    pub fn attachment(&self) -> Option<&UploadedFile> {
        self.gate.attached()
    }

    pub fn submission_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn record(&self) -> Option<&StudentRecord> {
        self.record.as_ref()
    }

    pub fn chrome_visible(&self) -> bool {
        self.chrome_visible
    }

    pub fn drop_zone_active(&self) -> bool {
        self.drop_zone_active
    }

    pub fn active_confetti(&self) -> &[BurstId] {
        &self.confetti
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Absolute clock offset at which the next deferred callback is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn enter(&mut self, view: WizardView) -> Outcome {
        let entry = self.sections.enter(view);
        let record = match view {
            WizardView::Search => None,
            _ => self.record.clone(),
        };
        self.presenter.render(&ViewFrame {
            view,
            entry,
            record,
        });
        info!(view = view.label(), "section entered");
        Outcome::Entered { view }
    }

    fn reject(&mut self, err: WizardError) -> WizardError {
        warn!(code = err.code(), error = %err, "wizard input rejected");
        self.show_alert(err.user_message(), AlertSeverity::Error);
        err
    }

    fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::CompleteLookup(query) => self.complete_lookup(query),
            Deferred::CompletePayment => self.complete_payment(),
            Deferred::ExpireAlert(id) => {
                if self.notifications.dismiss(id).is_some() {
                    debug!(alert = id.0, "alert expired");
                    self.presenter.dismiss(id);
                }
            }
            Deferred::ClearConfetti(id) => {
                self.confetti.retain(|active| *active != id);
                self.presenter.clear_confetti(id);
            }
            Deferred::RestoreChrome => {
                self.chrome_visible = true;
                self.presenter.set_chrome_visible(true);
            }
        }
    }

    fn complete_lookup(&mut self, query: SearchQuery) {
        self.hide_loading();

        match self.directory.find_match(&query).cloned() {
            Some(record) => {
                info!(student_id = %record.id, "record matched");
                self.record = Some(record);
                self.enter(WizardView::Results);
            }
            None => {
                self.reject(WizardError::NotFound {
                    student_id: query.student_id,
                });
            }
        }
    }

    fn complete_payment(&mut self) {
        self.hide_loading();
        info!("payment receipt submitted");
        self.enter(WizardView::Success);
        self.celebrate();
    }

    fn celebrate(&mut self) {
        self.next_burst += 1;
        let burst = ConfettiBurst::generate(BurstId(self.next_burst), &mut self.rng);
        self.presenter.celebrate(&burst);
        self.confetti.push(burst.id);
        let due = self.clock.now() + burst.lifetime;
        self.timeline.schedule(due, Deferred::ClearConfetti(burst.id));
    }
}
