/// User-input failures raised by the wizard. None of them is fatal; the
/// controller surfaces each one as an error banner before returning it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("student id and application number are both required")]
    Validation,
    #[error("no record matches student id {student_id}")]
    NotFound { student_id: String },
    #[error("file type '{mime_type}' is not accepted")]
    UnsupportedType { mime_type: String },
    #[error("file is {size_bytes} bytes; the limit is {limit_bytes} bytes")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("a payment receipt must be attached before submitting")]
    NoAttachment,
}

impl WizardError {
    /// Banner text shown to the applicant. The size banner quotes the
    /// configured limit.
    pub fn user_message(&self) -> String {
        match self {
            WizardError::Validation => "يرجى إدخال جميع البيانات المطلوبة".to_string(),
            WizardError::NotFound { .. } => {
                "لم يتم العثور على بيانات مطابقة. يرجى التأكد من صحة البيانات المدخلة".to_string()
            }
            WizardError::UnsupportedType { .. } => {
                "نوع الملف غير مدعوم. يرجى اختيار صورة أو ملف PDF".to_string()
            }
            WizardError::FileTooLarge { limit_bytes, .. } => format!(
                "حجم الملف كبير جداً. يرجى اختيار ملف أصغر من {} ميجابايت",
                megabytes(*limit_bytes)
            ),
            WizardError::NoAttachment => "يرجى إرفاق إيصال السداد أولاً".to_string(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            WizardError::Validation => "validation",
            WizardError::NotFound { .. } => "not_found",
            WizardError::UnsupportedType { .. } => "unsupported_type",
            WizardError::FileTooLarge { .. } => "file_too_large",
            WizardError::NoAttachment => "no_attachment",
        }
    }
}

const MEBIBYTE: u64 = 1024 * 1024;

fn megabytes(bytes: u64) -> String {
    if bytes % MEBIBYTE == 0 {
        (bytes / MEBIBYTE).to_string()
    } else {
        format!("{:.1}", bytes as f64 / MEBIBYTE as f64)
    }
}
