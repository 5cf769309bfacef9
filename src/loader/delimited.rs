//! CSV読み込み

use crate::error::{AppError, Result};
use ticket_entry_common::Table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSVバイト列を表に変換
///
/// - 1行目をヘッダーとする
/// - 空セルは null、値の前後空白はそのまま残す
/// - 行ごとの列数の違いは許容（不足分は null）
pub fn parse_csv(bytes: &[u8], file_name: &str) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|e| AppError::parse(file_name, e))?,
        None => return Err(AppError::parse(file_name, "הקובץ ריק")),
    };
    let mut table = Table::new(header.iter());

    for record in records {
        let record = record.map_err(|e| AppError::parse(file_name, e))?;
        let cells = record
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
            .collect();
        table.push_row(cells);
    }

    Ok(table)
}
