//! 集計モジュール
//!
//! 照合結果から入場数・未入場数・入場率を算出する。
//! 券種がある場合は通常券／定期券の内訳も出す。

use crate::category::Category;
use crate::error::{Error, Result};
use crate::reconcile::Reconciliation;
use crate::table::{Table, ORIGIN_COLUMN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 入場率（百分率、小数第1位で丸め済み）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryRate(f64);

impl EntryRate {
    fn from_counts(entered: usize, total: usize) -> Self {
        if total == 0 {
            return Self(0.0);
        }
        let percent = entered as f64 / total as f64 * 100.0;
        Self((percent * 10.0).round() / 10.0)
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for EntryRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// 全体の件数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_tickets: usize,
    pub total_entered: usize,
    pub total_not_entered: usize,
    pub entry_rate: EntryRate,
}

/// 券種別の内訳
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub entered_regular: usize,
    pub entered_season: usize,
    pub not_entered_regular: usize,
    pub not_entered_season: usize,
}

/// 集計結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryMetrics {
    /// 券種なし
    Basic { totals: Totals },
    /// 券種内訳あり
    WithCategory {
        totals: Totals,
        breakdown: CategoryBreakdown,
    },
}

impl SummaryMetrics {
    pub fn totals(&self) -> &Totals {
        match self {
            SummaryMetrics::Basic { totals } => totals,
            SummaryMetrics::WithCategory { totals, .. } => totals,
        }
    }

    pub fn breakdown(&self) -> Option<&CategoryBreakdown> {
        match self {
            SummaryMetrics::Basic { .. } => None,
            SummaryMetrics::WithCategory { breakdown, .. } => Some(breakdown),
        }
    }

    /// 「合計 X 枚中 Y 枚入場 (R)」形式の一文
    pub fn headline(&self) -> String {
        let t = self.totals();
        format!(
            "סה״כ נכנסו: {} מתוך {} ({})",
            t.total_entered, t.total_tickets, t.entry_rate
        )
    }
}

/// 照合結果を集計する
pub fn summarize(reconciled: &Reconciliation) -> Result<SummaryMetrics> {
    let total = reconciled.row_count();
    if total == 0 {
        return Err(Error::EmptyInput("אין כרטיסים בקובץ".into()));
    }

    let entered = reconciled.entered();
    let total_entered = entered.iter().filter(|&&e| e).count();
    let total_not_entered = entered.iter().filter(|&&e| !e).count();

    if total_entered + total_not_entered != total {
        return Err(Error::Inconsistent(format!(
            "entered {} + not entered {} != total {}",
            total_entered, total_not_entered, total
        )));
    }

    let totals = Totals {
        total_tickets: total,
        total_entered,
        total_not_entered,
        entry_rate: EntryRate::from_counts(total_entered, total),
    };

    let Some(categories) = reconciled.categories() else {
        return Ok(SummaryMetrics::Basic { totals });
    };

    let mut breakdown = CategoryBreakdown::default();
    for (&is_entered, category) in entered.iter().zip(categories) {
        let slot = match (is_entered, category) {
            (true, Category::Regular) => &mut breakdown.entered_regular,
            (true, Category::Season) => &mut breakdown.entered_season,
            (false, Category::Regular) => &mut breakdown.not_entered_regular,
            (false, Category::Season) => &mut breakdown.not_entered_season,
        };
        *slot += 1;
    }

    if breakdown.entered_regular + breakdown.entered_season != total_entered
        || breakdown.not_entered_regular + breakdown.not_entered_season != total_not_entered
    {
        return Err(Error::Inconsistent(format!(
            "category breakdown {:?} does not match totals {}/{}",
            breakdown, total_entered, total_not_entered
        )));
    }

    Ok(SummaryMetrics::WithCategory { totals, breakdown })
}

/// 招待券（origin が空）の枚数
///
/// origin 列がなければ `None`。照合とは無関係に発券表から直接数える。
pub fn complimentary_count(tickets: &Table) -> Option<usize> {
    let col = tickets.column_index(ORIGIN_COLUMN)?;
    Some(tickets.column_values(col).filter(Option::is_none).count())
}
