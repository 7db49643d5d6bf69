use crate::infra::{load_directory, receipt_from_path};
use admission_wizard::config::WizardConfig;
use admission_wizard::error::AppError;
use admission_wizard::workflows::wizard::{
    Alert, AlertId, BurstId, ConfettiBurst, InvoiceDocument, ManualClock, Outcome, Presenter,
    SearchQuery, UploadedFile, ViewFrame, WizardController, WizardError, WizardEvent,
    WizardSnapshot, WizardView,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_STUDENT_ID: &str = "1140959790";
const DEMO_APPLICATION_NUMBER: &str = "TR2024001";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Student id entered on the search form
    #[arg(long, default_value = DEMO_STUDENT_ID)]
    pub(crate) student_id: String,
    /// Application number entered on the search form
    #[arg(long, default_value = DEMO_APPLICATION_NUMBER)]
    pub(crate) application_number: String,
    /// Receipt file to attach (defaults to a synthetic 120 KB PDF)
    #[arg(long)]
    pub(crate) receipt: Option<PathBuf>,
    /// Invoice issue date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// CSV record table replacing the built-in one
    #[arg(long)]
    pub(crate) records: Option<PathBuf>,
    /// Print the invoice before uploading the receipt
    #[arg(long)]
    pub(crate) print: bool,
    /// Print the final wizard state as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// Student id to look up
    #[arg(long)]
    pub(crate) student_id: String,
    /// Application number that must match the record
    #[arg(long)]
    pub(crate) application_number: String,
    /// CSV record table replacing the built-in one
    #[arg(long)]
    pub(crate) records: Option<PathBuf>,
}

/// Terminal rendering of the wizard's output effects.
#[derive(Debug, Default)]
pub(crate) struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn render(&mut self, frame: &ViewFrame) {
        println!("\n== {} ==", frame.view.label());
        if let (WizardView::Results, Some(record)) = (frame.view, &frame.record) {
            println!("- Name: {}", record.name);
            println!("- Qualification: {}", record.qualification);
            println!("- Major: {}", record.major);
            println!("- Admission status: {}", record.status);
            println!("- Application number: {}", record.application_number);
        }
    }

    fn notify(&mut self, alert: &Alert) {
        println!("  [{}] {}", alert.severity.label(), alert.message);
    }

    fn dismiss(&mut self, _id: AlertId) {}

    fn show_busy(&mut self) {
        println!("  ... processing");
    }

    fn hide_busy(&mut self) {}

    fn attachment_changed(&mut self, attached: Option<&UploadedFile>) {
        match attached {
            Some(file) => println!(
                "  Receipt attached: {} ({}, {} bytes); payment submission enabled",
                file.name, file.mime_type, file.size_bytes
            ),
            None => println!("  Receipt cleared; payment submission disabled"),
        }
    }

    fn highlight_drop_zone(&mut self, _active: bool) {}

    fn open_file_picker(&mut self) {}

    fn reset_search_form(&mut self) {
        println!("  Search form cleared");
    }

    fn print(&mut self, invoice: &InvoiceDocument) {
        println!("  Invoice for {} ({})", invoice.student_name, invoice.student_id);
        println!(
            "  Application {} | {} / {} | issued {}",
            invoice.application_number, invoice.qualification, invoice.major, invoice.issued_on
        );
    }

    fn set_chrome_visible(&mut self, _visible: bool) {}

    fn celebrate(&mut self, burst: &ConfettiBurst) {
        println!("  *** {} pieces of confetti ***", burst.pieces.len());
    }

    fn clear_confetti(&mut self, _id: BurstId) {}
}

type DemoWizard = WizardController<ManualClock, ConsolePresenter>;

/// Jump virtual time forward until the loading overlay is gone.
fn settle(clock: &ManualClock, wizard: &mut DemoWizard) {
    while wizard.is_busy() {
        let Some(deadline) = wizard.next_deadline() else {
            break;
        };
        let wait = deadline.saturating_sub(wizard.now());
        println!("  (+{} ms)", wait.as_millis());
        clock.advance(wait);
        wizard.tick();
    }
}

fn report(step: &str, result: Result<Outcome, WizardError>) -> bool {
    match result {
        Ok(Outcome::Ignored { reason }) => {
            println!("  {step} ignored ({reason:?})");
            false
        }
        Ok(_) => true,
        Err(err) => {
            println!("  {step} rejected: {err}");
            false
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        student_id,
        application_number,
        receipt,
        today,
        records,
        print,
        json,
    } = args;

    let config = WizardConfig::default();
    let directory = Arc::new(load_directory(&config, records)?);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let clock = Arc::new(ManualClock::new(today));
    let mut wizard = WizardController::new(clock.clone(), ConsolePresenter, directory, config);

    println!("Admission fee wizard demo");
    println!("Searching for {student_id} / {application_number}");
    let searched = wizard.handle(WizardEvent::SubmitSearch {
        student_id,
        application_number,
    });
    if report("search", searched) {
        settle(&clock, &mut wizard);
    }
    if wizard.view() != WizardView::Results {
        println!("\nNo matching record; demo stops on the search section.");
        return Ok(());
    }

    report("show invoice", wizard.handle(WizardEvent::ShowInvoice));
    if print {
        report("print", wizard.handle(WizardEvent::PrintInvoice));
    }

    let file = match receipt {
        Some(path) => receipt_from_path(&path)?,
        None => UploadedFile {
            name: "receipt.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 120_000,
        },
    };
    report(
        "receipt upload",
        wizard.handle(WizardEvent::FileSelected { file: Some(file) }),
    );

    if report("payment", wizard.handle(WizardEvent::SubmitPayment)) {
        settle(&clock, &mut wizard);
    }

    if json {
        let snapshot = WizardSnapshot::capture(&wizard);
        match serde_json::to_string_pretty(&snapshot) {
            Ok(payload) => println!("\nWizard state:\n{payload}"),
            Err(err) => println!("\nWizard state unavailable: {err}"),
        }
    }

    Ok(())
}

pub(crate) fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let LookupArgs {
        student_id,
        application_number,
        records,
    } = args;

    let directory = load_directory(&WizardConfig::default(), records)?;
    let query = SearchQuery::new(&student_id, &application_number);
    if !query.is_complete() {
        println!("Both --student-id and --application-number must be non-empty");
        return Ok(());
    }

    match directory.find_match(&query) {
        Some(record) => match serde_json::to_string_pretty(record) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Record found but could not be rendered: {err}"),
        },
        None => println!("No record matches {}", query.student_id),
    }

    Ok(())
}
