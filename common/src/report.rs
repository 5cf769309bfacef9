//! 集計テキスト出力
//!
//! コピー＆ペーストやテキストファイル保存用に、
//! 集計値を固定順・1行1項目で書き出す。

use crate::summary::SummaryMetrics;

const LABEL_TOTAL: &str = "סה״כ כרטיסים";
const LABEL_ENTERED: &str = "סה״כ נכנסו";
const LABEL_NOT_ENTERED: &str = "סה״כ לא נכנסו";
const LABEL_ENTRY_RATE: &str = "אחוז כניסה";
const LABEL_ENTERED_REGULAR: &str = "כרטיסים רגילים שנכנסו";
const LABEL_ENTERED_SEASON: &str = "כרטיסים ממנוי שנכנסו";
const LABEL_NOT_ENTERED_REGULAR: &str = "כרטיסים רגילים שלא נכנסו";
const LABEL_NOT_ENTERED_SEASON: &str = "כרטיסים ממנוי שלא נכנסו";
const LABEL_COMPLIMENTARY: &str = "כרטיסי הזמנה (ללא מקור)";

/// 集計テキストを生成する
///
/// 順序: 合計 → 入場 → 未入場 → 入場率 → (券種内訳4行) → (招待券)
pub fn render_summary(metrics: &SummaryMetrics, complimentary: Option<usize>) -> String {
    let totals = metrics.totals();
    let mut lines = vec![
        format!("{}: {}", LABEL_TOTAL, totals.total_tickets),
        format!("{}: {}", LABEL_ENTERED, totals.total_entered),
        format!("{}: {}", LABEL_NOT_ENTERED, totals.total_not_entered),
        format!("{}: {}", LABEL_ENTRY_RATE, totals.entry_rate),
    ];

    if let Some(b) = metrics.breakdown() {
        lines.push(format!("{}: {}", LABEL_ENTERED_REGULAR, b.entered_regular));
        lines.push(format!("{}: {}", LABEL_ENTERED_SEASON, b.entered_season));
        lines.push(format!("{}: {}", LABEL_NOT_ENTERED_REGULAR, b.not_entered_regular));
        lines.push(format!("{}: {}", LABEL_NOT_ENTERED_SEASON, b.not_entered_season));
    }

    if let Some(count) = complimentary {
        lines.push(format!("{}: {}", LABEL_COMPLIMENTARY, count));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
