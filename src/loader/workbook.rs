//! Excel読み込み（calamine）

use super::InputFormat;
use crate::error::{AppError, Result};
use calamine::{open_workbook_from_rs, Data, Ods, Range, Reader, Xls, Xlsb, Xlsx};
use std::io::Cursor;
use ticket_entry_common::Table;

type Source = Cursor<Vec<u8>>;

/// 整数として表示する浮動小数点の上限（f64で正確に表せる範囲）
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Excelバイト列の最初のシートを表に変換
///
/// 最初の空でない行をヘッダーとする。
pub fn parse_excel(bytes: &[u8], format: InputFormat, file_name: &str) -> Result<Table> {
    let source = Cursor::new(bytes.to_vec());
    let range = match format {
        InputFormat::Xlsx => first_sheet::<Xlsx<Source>>(source, file_name)?,
        InputFormat::Xls => first_sheet::<Xls<Source>>(source, file_name)?,
        InputFormat::Xlsb => first_sheet::<Xlsb<Source>>(source, file_name)?,
        InputFormat::Ods => first_sheet::<Ods<Source>>(source, file_name)?,
        InputFormat::Csv => {
            return Err(AppError::parse(file_name, "CSV is not a workbook format"));
        }
    };

    range_to_table(&range, file_name)
}

fn first_sheet<R>(source: Source, file_name: &str) -> Result<Range<Data>>
where
    R: Reader<Source>,
    R::Error: std::fmt::Display,
{
    let mut workbook: R =
        open_workbook_from_rs(source).map_err(|e| AppError::parse(file_name, e))?;

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(AppError::parse(file_name, e)),
        None => Err(AppError::parse(file_name, "לא נמצא גיליון בקובץ")),
    }
}

fn range_to_table(range: &Range<Data>, file_name: &str) -> Result<Table> {
    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|cell| cell_text(cell).is_none()));

    let header = rows
        .next()
        .ok_or_else(|| AppError::parse(file_name, "הגיליון ריק"))?;

    let columns = header.iter().enumerate().map(|(i, cell)| {
        cell_text(cell).unwrap_or_else(|| format!("Unnamed: {}", i))
    });
    let mut table = Table::new(columns);

    for row in rows {
        table.push_row(row.iter().map(cell_text).collect());
    }

    Ok(table)
}

/// セル値を文字列化する
///
/// 整数値の浮動小数点は小数部なしで出力し、CSV側のバーコード表記と揃える。
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            Some(format!("{}", *f as i64))
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| dt.as_f64().to_string()),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
