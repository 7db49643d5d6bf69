use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{SearchQuery, StudentRecord};

/// Static lookup table of applicants, keyed by student id.
#[derive(Debug, Clone)]
pub struct RecordDirectory {
    records: BTreeMap<String, StudentRecord>,
}

impl RecordDirectory {
    /// The built-in table shipped with the wizard.
    pub fn standard() -> Self {
        let record = StudentRecord {
            id: "1140959790".to_string(),
            name: "نوف بنت محمد بن فرحان التركي".to_string(),
            qualification: "بكالوريوس".to_string(),
            major: "تمريض - مسار التخصصات الصحية".to_string(),
            status: "مقبول".to_string(),
            application_number: "TR2024001".to_string(),
        };

        let mut records = BTreeMap::new();
        records.insert(record.id.clone(), record);
        Self { records }
    }

    pub fn from_records<I>(records: I) -> Result<Self, DirectoryImportError>
    where
        I: IntoIterator<Item = StudentRecord>,
    {
        let mut table = BTreeMap::new();
        for (row, record) in records.into_iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(DirectoryImportError::EmptyId { row: row + 1 });
            }
            if table.contains_key(&record.id) {
                return Err(DirectoryImportError::DuplicateId(record.id));
            }
            table.insert(record.id.clone(), record);
        }
        Ok(Self { records: table })
    }

    /// Load a table exported as `id,name,qualification,major,status,application_number`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DirectoryImportError> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = csv
            .deserialize::<StudentRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryImportError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn get(&self, student_id: &str) -> Option<&StudentRecord> {
        self.records.get(student_id)
    }

    /// Exact, case-sensitive match on both identifiers.
    pub fn find_match(&self, query: &SearchQuery) -> Option<&StudentRecord> {
        self.records
            .get(&query.student_id)
            .filter(|record| record.application_number == query.application_number)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RecordDirectory {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryImportError {
    #[error("unable to read record table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record table: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {row} has an empty id")]
    EmptyId { row: usize },
    #[error("student id {0} appears more than once")]
    DuplicateId(String),
}
