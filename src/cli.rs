use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ticket-entry")]
#[command(about = "ניתוח כניסות לאירוע: הצלבת קובץ הכרטיסים מול קובץ נתוני הכניסה", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// פלט לוג מפורט
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ניתוח כרטיסים: סיכום + ייצוא טבלאות
    Analyze {
        /// קובץ הכרטיסים הראשי (CSV או Excel, עמודת barcode)
        #[arg(required = true)]
        tickets: PathBuf,

        /// קובץ נתוני הכניסה (CSV או Excel, עמודת Barcode)
        #[arg(required = true)]
        entries: PathBuf,

        /// תיקיית פלט (ברירת מחדל: מההגדרות או ./ticket-report)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// פורמט ייצוא (csv/excel/both)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// מחרוזת לזיהוי כרטיסי מנוי בעמודת ticketName
        #[arg(short, long)]
        marker: Option<String>,

        /// הצגת סיכום בלבד, ללא כתיבת קבצים
        #[arg(long)]
        no_export: bool,

        /// הדפסת הסיכום כ-JSON
        #[arg(long)]
        json: bool,
    },

    /// טקסט הסיכום בלבד (להעתקה או לשמירה לקובץ)
    Summary {
        /// קובץ הכרטיסים הראשי
        #[arg(required = true)]
        tickets: PathBuf,

        /// קובץ נתוני הכניסה
        #[arg(required = true)]
        entries: PathBuf,

        /// מחרוזת לזיהוי כרטיסי מנוי
        #[arg(short, long)]
        marker: Option<String>,

        /// קובץ טקסט לשמירה (ברירת מחדל: הדפסה למסך)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// הצגה/עריכה של ההגדרות
    Config {
        /// קביעת מחרוזת המנוי
        #[arg(long)]
        set_marker: Option<String>,

        /// הצגת ההגדרות
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
