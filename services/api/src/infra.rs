use admission_wizard::config::WizardConfig;
use admission_wizard::workflows::wizard::{
    Clock, DirectoryImportError, Presenter, RecordDirectory, SharedWizard, UploadedFile,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// How often the server runs due deferred callbacks.
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// An explicit path wins over `WIZARD_RECORDS_CSV`; otherwise the built-in table.
pub(crate) fn load_directory(
    config: &WizardConfig,
    override_path: Option<PathBuf>,
) -> Result<RecordDirectory, DirectoryImportError> {
    match override_path.or_else(|| config.records_csv.clone()) {
        Some(path) => {
            let directory = RecordDirectory::from_path(&path)?;
            info!(path = %path.display(), records = directory.len(), "record table imported");
            Ok(directory)
        }
        None => Ok(RecordDirectory::standard()),
    }
}

pub(crate) fn receipt_from_path(path: &Path) -> std::io::Result<UploadedFile> {
    let metadata = std::fs::metadata(path)?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadedFile {
        name,
        mime_type,
        size_bytes: metadata.len(),
    })
}

pub(crate) fn spawn_ticker<C, P>(wizard: SharedWizard<C, P>, period: Duration) -> JoinHandle<()>
where
    C: Clock + 'static,
    P: Presenter + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let fired = wizard
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .tick();
            if fired > 0 {
                debug!(fired, "deferred wizard callbacks ran");
            }
        }
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
