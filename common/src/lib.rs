//! Ticket Entry Common Library
//!
//! 発券データと入場データの照合・集計ロジック（I/Oなし）

pub mod table;
pub mod category;
pub mod reconcile;
pub mod summary;
pub mod report;
pub mod error;
pub mod export;

pub use table::{
    FileRole, Table, ENTRY_BARCODE_COLUMN, ORIGIN_COLUMN, TICKET_BARCODE_COLUMN,
    TICKET_NAME_COLUMN,
};
pub use category::{Category, CategoryClassifier, DEFAULT_SEASON_MARKER};
pub use reconcile::{reconcile, JoinStats, Reconciliation, Subset, CATEGORY_COLUMN, ENTERED_COLUMN};
pub use summary::{complimentary_count, summarize, CategoryBreakdown, EntryRate, SummaryMetrics, Totals};
pub use report::render_summary;
pub use error::{Error, Result};
