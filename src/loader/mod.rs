//! 入力ファイル読み込みモジュール
//!
//! 拡張子で形式を判定し（中身は見ない）、CSV/Excelを `Table` に変換する。

mod delimited;
mod workbook;

use crate::error::{AppError, Result};
use std::path::Path;
use ticket_entry_common::Table;

/// 入力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
    Xls,
    Xlsb,
    Ods,
}

const SUPPORTED_EXTENSIONS: &[(&str, InputFormat)] = &[
    ("csv", InputFormat::Csv),
    ("xlsx", InputFormat::Xlsx),
    ("xlsm", InputFormat::Xlsx),
    ("xls", InputFormat::Xls),
    ("xlsb", InputFormat::Xlsb),
    ("ods", InputFormat::Ods),
];

impl InputFormat {
    /// ファイル名の拡張子から形式を決める（大文字小文字は区別しない）
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let ext = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        SUPPORTED_EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, format)| *format)
            .ok_or_else(|| AppError::UnsupportedFormat(file_name.to_string()))
    }
}

/// ファイルを読み込んで表に変換
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    // 形式チェックを先に行い、未対応ファイルは読まない
    InputFormat::from_file_name(&file_name)?;

    let bytes = std::fs::read(path)?;
    load_table_from_bytes(&bytes, &file_name)
}

/// バイト列を表に変換（アップロードされたデータ用）
pub fn load_table_from_bytes(bytes: &[u8], file_name: &str) -> Result<Table> {
    let format = InputFormat::from_file_name(file_name)?;
    tracing::debug!(file = file_name, ?format, bytes = bytes.len(), "loading table");

    let table = match format {
        InputFormat::Csv => delimited::parse_csv(bytes, file_name)?,
        _ => workbook::parse_excel(bytes, format, file_name)?,
    };

    tracing::debug!(
        file = file_name,
        rows = table.row_count(),
        columns = table.columns().len(),
        "table loaded"
    );
    Ok(table)
}
