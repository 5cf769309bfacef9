//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに保存する。

use crate::error::{AppError, Result};
use std::path::Path;
use ticket_entry_common::export::excel_core::table_to_xlsx_buffer;
use ticket_entry_common::Table;

pub fn generate_excel(table: &Table, output_path: &Path, sheet_name: &str) -> Result<()> {
    let buffer = table_to_xlsx_buffer(table, sheet_name, true)
        .map_err(AppError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
