//! 解析の流れをまとめるモジュール
//!
//! 読み込み → 必須列チェック → 照合 → 集計 を1回の呼び出しで行い、
//! 結果は変更不可の `AnalysisReport` として返す。状態は持たない。

use crate::error::Result;
use crate::loader;
use serde::Serialize;
use std::path::PathBuf;
use ticket_entry_common::{
    complimentary_count, reconcile, render_summary, summarize, CategoryClassifier, Error,
    FileRole, JoinStats, Reconciliation, SummaryMetrics, Table,
};

/// 解析リクエスト（1組の入力ファイル）
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// 発券ファイル（barcode列必須）
    pub tickets: PathBuf,
    /// 入場ファイル（Barcode列必須）
    pub entries: PathBuf,
    pub classifier: CategoryClassifier,
}

/// 解析結果
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    reconciliation: Reconciliation,
    metrics: SummaryMetrics,
    complimentary: Option<usize>,
}

/// JSON出力用
#[derive(Serialize)]
struct ReportJson<'a> {
    metrics: &'a SummaryMetrics,
    complimentary: Option<usize>,
    join: JoinStats,
    generated_at: String,
}

impl AnalysisReport {
    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    pub fn metrics(&self) -> &SummaryMetrics {
        &self.metrics
    }

    /// 招待券の枚数（origin列がなければ `None`）
    pub fn complimentary(&self) -> Option<usize> {
        self.complimentary
    }

    /// 1行1項目の集計テキスト
    pub fn summary_text(&self) -> String {
        render_summary(&self.metrics, self.complimentary)
    }

    pub fn to_json(&self) -> Result<String> {
        let json = ReportJson {
            metrics: &self.metrics,
            complimentary: self.complimentary,
            join: self.reconciliation.stats(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

/// ファイルを読み込んで解析する
pub fn run_analysis(request: &AnalysisRequest) -> Result<AnalysisReport> {
    let span = tracing::info_span!(
        "analysis",
        tickets = %request.tickets.display(),
        entries = %request.entries.display()
    );
    let _guard = span.enter();

    let tickets = loader::load_table(&request.tickets)?;
    let entries = loader::load_table(&request.entries)?;

    analyze_tables(&tickets, &entries, &request.classifier)
}

/// 読み込み済みの2つの表を解析する
pub fn analyze_tables(
    tickets: &Table,
    entries: &Table,
    classifier: &CategoryClassifier,
) -> Result<AnalysisReport> {
    tickets.require_key_column(FileRole::Issuance)?;
    entries.require_key_column(FileRole::Entry)?;

    if tickets.is_empty() {
        return Err(Error::EmptyInput(FileRole::Issuance.label().to_string()).into());
    }

    let reconciliation = reconcile(tickets, entries, classifier)?;
    let stats = reconciliation.stats();
    if stats.duplicate_entries > 0 {
        tracing::warn!(
            duplicates = stats.duplicate_entries,
            "entry file has repeated barcodes; first scan wins"
        );
    }
    if stats.unmatched_entries > 0 {
        tracing::info!(
            unmatched = stats.unmatched_entries,
            "entry rows without a matching ticket were ignored"
        );
    }

    let metrics = summarize(&reconciliation)?;
    let complimentary = complimentary_count(tickets);
    if complimentary.is_none() {
        tracing::debug!("no origin column; complimentary count skipped");
    }

    tracing::info!(
        total = metrics.totals().total_tickets,
        entered = metrics.totals().total_entered,
        rate = %metrics.totals().entry_rate,
        with_category = metrics.breakdown().is_some(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        reconciliation,
        metrics,
        complimentary,
    })
}
