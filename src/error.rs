use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("שגיאה בהגדרות: {0}")]
    Config(String),

    #[error("הקובץ לא נמצא: {0}")]
    FileNotFound(String),

    #[error("סוג קובץ לא נתמך: {0} (נתמכים: csv, xlsx, xls)")]
    UnsupportedFormat(String),

    #[error("שגיאה בטעינת הקובץ {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("שגיאת JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("שגיאת IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("שגיאה ביצירת CSV: {0}")]
    CsvGeneration(String),

    #[error("שגיאה ביצירת Excel: {0}")]
    ExcelGeneration(String),

    #[error(transparent)]
    Common(#[from] ticket_entry_common::Error),
}

impl AppError {
    pub(crate) fn parse(file: &str, reason: impl std::fmt::Display) -> Self {
        AppError::Parse {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
