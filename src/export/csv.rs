//! CSV出力
//!
//! 表計算ソフトでヘブライ語が文字化けしないよう、先頭にBOMを付ける。

use crate::error::{AppError, Result};
use std::path::Path;
use ticket_entry_common::Table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn write_csv(table: &Table, output_path: &Path) -> Result<()> {
    let bytes = table_to_csv_bytes(table)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}

/// 表をBOM付きUTF-8のCSVに変換（null は空欄）
pub fn table_to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(table.columns())
        .map_err(|e| AppError::CsvGeneration(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .map_err(|e| AppError::CsvGeneration(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::CsvGeneration(e.to_string()))
}
