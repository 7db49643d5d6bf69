use admission_wizard::config::WizardConfig;
use admission_wizard::workflows::wizard::{
    ManualClock, Outcome, RecordDirectory, TracingPresenter, UploadedFile, WizardController,
    WizardError, WizardEvent, WizardSnapshot, WizardView,
};
use chrono::NaiveDate;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date"),
    ))
}

fn config() -> WizardConfig {
    WizardConfig {
        confetti_seed: Some(5),
        ..WizardConfig::default()
    }
}

fn search(student_id: &str, application_number: &str) -> WizardEvent {
    WizardEvent::SubmitSearch {
        student_id: student_id.to_string(),
        application_number: application_number.to_string(),
    }
}

#[test]
fn complete_cycle_with_builtin_table() {
    let clock = clock();
    let mut wizard = WizardController::new(
        clock.clone(),
        TracingPresenter,
        Arc::new(RecordDirectory::standard()),
        config(),
    );

    wizard
        .handle(search("1140959790", "TR2024001"))
        .expect("lookup scheduled");
    clock.advance(Duration::from_millis(1_500));
    assert_eq!(wizard.tick(), 1);
    assert_eq!(wizard.view(), WizardView::Results);

    wizard.handle(WizardEvent::ShowInvoice).expect("invoice");
    wizard
        .handle(WizardEvent::Drop {
            files: vec![UploadedFile {
                name: "receipt.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                size_bytes: 300_000,
            }],
        })
        .expect("receipt accepted");
    wizard
        .handle(WizardEvent::SubmitPayment)
        .expect("payment scheduled");

    clock.advance(Duration::from_millis(2_000));
    wizard.tick();
    let snapshot = WizardSnapshot::capture(&wizard);
    assert_eq!(snapshot.view, WizardView::Success);
    assert!(snapshot.confetti_active);
    assert!(!snapshot.busy);

    assert_eq!(
        wizard.handle(WizardEvent::StartNewSearch),
        Ok(Outcome::Entered {
            view: WizardView::Search
        })
    );
    assert!(!wizard.submission_unlocked());
}

#[test]
fn imported_table_replaces_builtin_records() {
    let csv = "id,name,qualification,major,status,application_number\n\
               2200,Maha,Diploma,Radiology,Accepted,RX-7\n";
    let directory = RecordDirectory::from_csv_reader(Cursor::new(csv)).expect("csv imports");
    let clock = clock();
    let mut wizard =
        WizardController::new(clock.clone(), TracingPresenter, Arc::new(directory), config());

    wizard
        .handle(search("1140959790", "TR2024001"))
        .expect("lookup scheduled");
    clock.advance(Duration::from_millis(1_500));
    wizard.tick();
    assert_eq!(wizard.view(), WizardView::Search);
    assert_eq!(wizard.alerts().len(), 1);

    wizard.handle(search("2200", "RX-7")).expect("lookup scheduled");
    clock.advance(Duration::from_millis(1_500));
    wizard.tick();
    assert_eq!(wizard.view(), WizardView::Results);
    assert_eq!(wizard.record().map(|record| record.name.as_str()), Some("Maha"));
}

#[test]
fn configured_delays_are_honoured() {
    let clock = clock();
    let config = WizardConfig {
        lookup_delay: Duration::from_millis(10),
        alert_timeout: Duration::from_millis(50),
        ..config()
    };
    let mut wizard = WizardController::new(
        clock.clone(),
        TracingPresenter,
        Arc::new(RecordDirectory::standard()),
        config,
    );

    wizard.handle(search("1140959790", "nope")).expect("scheduled");
    clock.advance(Duration::from_millis(10));
    wizard.tick();
    assert_eq!(wizard.alerts().len(), 1);

    clock.advance(Duration::from_millis(50));
    wizard.tick();
    assert!(wizard.alerts().is_empty());

    assert_eq!(
        wizard.handle(search("", "")),
        Err(WizardError::Validation)
    );
}
