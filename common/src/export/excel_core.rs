//! Excel生成（共通ライブラリ）
//!
//! 照合結果の表を1シートのExcelとしてバッファに書き出す。

use crate::table::Table;
use rust_xlsxwriter::*;

/// シート名の最大長（Excelの制限）
const MAX_SHEET_NAME_LEN: usize = 31;

/// 表をExcelバッファに変換
///
/// # Arguments
/// * `table` - 出力する表（null セルは空欄）
/// * `sheet_name` - シート名（31文字を超える分は切り捨て）
/// * `right_to_left` - ヘブライ語表示用にシートを右から左にする
pub fn table_to_xlsx_buffer(
    table: &Table,
    sheet_name: &str,
    right_to_left: bool,
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    let name: String = sheet_name.chars().take(MAX_SHEET_NAME_LEN).collect();
    worksheet.set_name(&name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    worksheet.set_right_to_left(right_to_left);

    for (col, header) in table.columns().iter().enumerate() {
        let col = column_number(col)?;
        worksheet.write_string_with_format(0, col, header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1)
            .map_err(|_| format!("行数が多すぎます: {}", row_idx + 1))?;
        for (col, cell) in row.iter().enumerate() {
            if let Some(value) = cell {
                worksheet.write_string(row_num, column_number(col)?, value)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    worksheet.autofit();

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn column_number(col: usize) -> Result<u16, String> {
    u16::try_from(col).map_err(|_| format!("列数が多すぎます: {}", col + 1))
}
