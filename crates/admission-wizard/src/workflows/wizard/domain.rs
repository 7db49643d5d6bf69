use serde::{Deserialize, Serialize};

/// The four mutually exclusive sections of the wizard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardView {
    Search,
    Results,
    Invoice,
    Success,
}

impl WizardView {
    pub const fn ordered() -> [Self; 4] {
        [Self::Search, Self::Results, Self::Invoice, Self::Success]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Results => "Results",
            Self::Invoice => "Invoice",
            Self::Success => "Success",
        }
    }

    /// Transition marker applied when the section is revealed.
    pub const fn entry_marker(self) -> Option<EntryMarker> {
        match self {
            Self::Search => None,
            Self::Results | Self::Success => Some(EntryMarker::FadeIn),
            Self::Invoice => Some(EntryMarker::SlideIn),
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Search => 0,
            Self::Results => 1,
            Self::Invoice => 2,
            Self::Success => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMarker {
    FadeIn,
    SlideIn,
}

/// A read-only entry of the applicant table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub qualification: String,
    pub major: String,
    pub status: String,
    pub application_number: String,
}

/// Search form input, trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub student_id: String,
    pub application_number: String,
}

impl SearchQuery {
    pub fn new(student_id: &str, application_number: &str) -> Self {
        Self {
            student_id: student_id.trim().to_string(),
            application_number: application_number.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.student_id.is_empty() && !self.application_number.is_empty()
    }
}

/// A file chosen through the picker or dropped on the upload area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    #[default]
    Info,
    Success,
    Error,
}

impl AlertSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }
}

/// Printable invoice assembled from the matched record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceDocument {
    pub student_id: String,
    pub student_name: String,
    pub application_number: String,
    pub qualification: String,
    pub major: String,
    pub admission_status: String,
    pub issued_on: chrono::NaiveDate,
}

impl InvoiceDocument {
    pub fn for_record(record: &StudentRecord, issued_on: chrono::NaiveDate) -> Self {
        Self {
            student_id: record.id.clone(),
            student_name: record.name.clone(),
            application_number: record.application_number.clone(),
            qualification: record.qualification.clone(),
            major: record.major.clone(),
            admission_status: record.status.clone(),
            issued_on,
        }
    }
}
