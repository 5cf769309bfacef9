pub mod csv;
pub mod excel;

use crate::analysis::AnalysisReport;
use crate::cli::ExportFormat;
use crate::error::Result;
use std::path::{Path, PathBuf};
use ticket_entry_common::Subset;

pub const SUMMARY_TEXT_FILE: &str = "summary.txt";
pub const SUMMARY_JSON_FILE: &str = "summary.json";

/// 解析結果を出力ディレクトリに書き出す
///
/// 結合表と各部分集合（CSV/Excel）、集計テキスト、集計JSONを出力し、
/// 書き出したファイルのパスを返す。
pub fn export_report(
    report: &AnalysisReport,
    format: &ExportFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    for subset in Subset::ALL {
        // 券種がない場合、券種別の集合は出力しない
        let Some(table) = report.reconciliation().subset(subset) else {
            continue;
        };
        let stem = subset.file_stem();

        if format.includes_csv() {
            let path = output_dir.join(format!("{}.csv", stem));
            csv::write_csv(&table, &path)?;
            written.push(path);
        }
        if format.includes_excel() {
            let path = output_dir.join(format!("{}.xlsx", stem));
            excel::generate_excel(&table, &path, stem)?;
            written.push(path);
        }
        tracing::debug!(subset = stem, rows = table.row_count(), "subset exported");
    }

    let text_path = output_dir.join(SUMMARY_TEXT_FILE);
    write_summary_text(report, &text_path)?;
    written.push(text_path);

    let json_path = output_dir.join(SUMMARY_JSON_FILE);
    std::fs::write(&json_path, report.to_json()?)?;
    written.push(json_path);

    tracing::info!(dir = %output_dir.display(), files = written.len(), "export complete");
    Ok(written)
}

/// 集計テキストをUTF-8で保存
pub fn write_summary_text(report: &AnalysisReport, path: &Path) -> Result<()> {
    std::fs::write(path, report.summary_text())?;
    Ok(())
}
