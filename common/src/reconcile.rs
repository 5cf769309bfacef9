//! 照合ロジック
//!
//! 発券表を基準に入場表をバーコードで左外部結合し、
//! 各チケットに入場済みフラグと券種区分を付与する。

use crate::category::{Category, CategoryClassifier};
use crate::error::Result;
use crate::table::{FileRole, Table, TICKET_NAME_COLUMN};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 入場済みフラグ列（V / X）
pub const ENTERED_COLUMN: &str = "Entered to the game?";
/// 券種区分列
pub const CATEGORY_COLUMN: &str = "ticketCategory";

const ENTERED_MARK: &str = "V";
const NOT_ENTERED_MARK: &str = "X";

/// 列名が両表で重複した場合の接尾辞
const TICKET_SUFFIX: &str = "_x";
const ENTRY_SUFFIX: &str = "_y";

/// 結合時の補足情報
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    /// 同じバーコードの2件目以降（採用されなかった入場行）
    pub duplicate_entries: usize,
    /// どのチケットにも対応しない入場行
    pub unmatched_entries: usize,
}

/// 照合結果（一度作ったら変更しない）
#[derive(Debug, Clone)]
pub struct Reconciliation {
    table: Table,
    entered: Vec<bool>,
    categories: Option<Vec<Category>>,
    stats: JoinStats,
}

/// 出力用の部分集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subset {
    All,
    Entered,
    NotEntered,
    EnteredRegular,
    EnteredSeason,
    NotEnteredRegular,
    NotEnteredSeason,
}

impl Subset {
    pub const ALL: [Subset; 7] = [
        Subset::All,
        Subset::Entered,
        Subset::NotEntered,
        Subset::EnteredRegular,
        Subset::EnteredSeason,
        Subset::NotEnteredRegular,
        Subset::NotEnteredSeason,
    ];

    /// 出力ファイル名（拡張子なし）
    pub fn file_stem(&self) -> &'static str {
        match self {
            Subset::All => "merged",
            Subset::Entered => "entered",
            Subset::NotEntered => "not_entered",
            Subset::EnteredRegular => "entered_regular",
            Subset::EnteredSeason => "entered_season",
            Subset::NotEnteredRegular => "not_entered_regular",
            Subset::NotEnteredSeason => "not_entered_season",
        }
    }

    fn entered_filter(&self) -> Option<bool> {
        match self {
            Subset::All => None,
            Subset::Entered | Subset::EnteredRegular | Subset::EnteredSeason => Some(true),
            Subset::NotEntered | Subset::NotEnteredRegular | Subset::NotEnteredSeason => {
                Some(false)
            }
        }
    }

    fn category_filter(&self) -> Option<Category> {
        match self {
            Subset::EnteredRegular | Subset::NotEnteredRegular => Some(Category::Regular),
            Subset::EnteredSeason | Subset::NotEnteredSeason => Some(Category::Season),
            _ => None,
        }
    }
}

impl Reconciliation {
    /// 結合済みの表（派生列を含む）
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// 行ごとの入場済みフラグ
    pub fn entered(&self) -> &[bool] {
        &self.entered
    }

    /// 行ごとの券種区分。ticketName列がなければ `None`
    pub fn categories(&self) -> Option<&[Category]> {
        self.categories.as_deref()
    }

    pub fn has_category(&self) -> bool {
        self.categories.is_some()
    }

    pub fn stats(&self) -> JoinStats {
        self.stats
    }

    pub fn row_count(&self) -> usize {
        self.entered.len()
    }

    /// 部分集合を取り出す。券種で絞る集合は券種がない場合 `None`
    pub fn subset(&self, subset: Subset) -> Option<Table> {
        let category = subset.category_filter();
        let categories = match (category, self.categories.as_deref()) {
            (Some(_), None) => return None,
            (_, cats) => cats,
        };
        let entered = subset.entered_filter();

        Some(self.table.filter_rows(|i| {
            let entered_ok = entered.map_or(true, |e| self.entered[i] == e);
            let category_ok = match (category, categories) {
                (Some(c), Some(cats)) => cats[i] == c,
                _ => true,
            };
            entered_ok && category_ok
        }))
    }
}

/// 発券表と入場表を照合する
///
/// - 結合は発券表基準（出力行数 = 発券行数、順序も維持）
/// - 入場表の同一バーコードは先頭の行のみ採用
/// - 入場済み判定は結合後の `Barcode` 値が null かどうかで行う
pub fn reconcile(
    tickets: &Table,
    entries: &Table,
    classifier: &CategoryClassifier,
) -> Result<Reconciliation> {
    let ticket_key = tickets.require_key_column(FileRole::Issuance)?;
    let entry_key = entries.require_key_column(FileRole::Entry)?;

    let mut table = Table::new(merged_columns(tickets.columns(), entries.columns()));

    // バーコード → 入場表の最初の行番号
    let mut index: HashMap<Option<&str>, usize> = HashMap::with_capacity(entries.row_count());
    let mut duplicate_entries = 0;
    for (i, key) in entries.column_values(entry_key).enumerate() {
        if index.contains_key(&key) {
            duplicate_entries += 1;
        } else {
            index.insert(key, i);
        }
    }

    let empty_entry = vec![None; entries.columns().len()];
    let mut entered = Vec::with_capacity(tickets.row_count());

    for ticket_row in tickets.rows() {
        let key = ticket_row.get(ticket_key).and_then(|c| c.as_deref());
        let matched = index.get(&key).map(|&i| &entries.rows()[i]);

        let is_entered = matched
            .and_then(|row| row.get(entry_key))
            .is_some_and(|barcode| barcode.is_some());
        entered.push(is_entered);

        let mut row = ticket_row.clone();
        row.extend(matched.unwrap_or(&empty_entry).iter().cloned());
        table.push_row(row);
    }

    let ticket_keys: HashSet<Option<&str>> = tickets.column_values(ticket_key).collect();
    let unmatched_entries = entries
        .column_values(entry_key)
        .filter(|key| !ticket_keys.contains(key))
        .count();

    let categories = table.column_index(TICKET_NAME_COLUMN).map(|col| {
        table
            .column_values(col)
            .map(|name| classifier.classify(name))
            .collect::<Vec<_>>()
    });

    table.set_column(
        ENTERED_COLUMN,
        entered
            .iter()
            .map(|&e| Some(if e { ENTERED_MARK } else { NOT_ENTERED_MARK }.to_string()))
            .collect(),
    );
    if let Some(cats) = &categories {
        table.set_column(
            CATEGORY_COLUMN,
            cats.iter().map(|c| Some(c.label().to_string())).collect(),
        );
    }

    Ok(Reconciliation {
        table,
        entered,
        categories,
        stats: JoinStats {
            duplicate_entries,
            unmatched_entries,
        },
    })
}

/// 結合後の列名。両表にある列名には接尾辞を付ける
fn merged_columns(ticket_columns: &[String], entry_columns: &[String]) -> Vec<String> {
    let ticket_set: HashSet<&str> = ticket_columns.iter().map(String::as_str).collect();
    let entry_set: HashSet<&str> = entry_columns.iter().map(String::as_str).collect();

    let left = ticket_columns.iter().map(|c| {
        if entry_set.contains(c.as_str()) {
            format!("{}{}", c, TICKET_SUFFIX)
        } else {
            c.clone()
        }
    });
    let right = entry_columns.iter().map(|c| {
        if ticket_set.contains(c.as_str()) {
            format!("{}{}", c, ENTRY_SUFFIX)
        } else {
            c.clone()
        }
    });
    left.chain(right).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
        let mut t = Table::new(columns.iter().copied());
        for row in rows {
            t.push_row(row.iter().map(|c| c.map(str::to_string)).collect());
        }
        t
    }

    fn barcodes(t: &Table) -> Vec<Option<&str>> {
        let col = t.column_index("barcode").unwrap();
        t.column_values(col).collect()
    }

    #[test]
    fn test_reconcile_basic_scenario() {
        let tickets = table(&["barcode"], &[&[Some("A1")], &[Some("A2")], &[Some("A3")]]);
        let entries = table(&["Barcode"], &[&[Some("A1")], &[Some("A3")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(result.row_count(), 3);
        assert_eq!(result.entered(), &[true, false, true]);
        assert!(!result.has_category());
        assert_eq!(result.table().cell(0, "Barcode"), Some("A1"));
        assert_eq!(result.table().cell(1, "Barcode"), None);
        assert_eq!(result.table().cell(1, ENTERED_COLUMN), Some("X"));
        assert_eq!(result.table().cell(2, ENTERED_COLUMN), Some("V"));
    }

    #[test]
    fn test_reconcile_preserves_ticket_order_and_count() {
        let tickets = table(
            &["barcode", "seat"],
            &[&[Some("C"), Some("1")], &[Some("A"), Some("2")], &[Some("B"), Some("3")]],
        );
        let entries = table(&["Barcode"], &[&[Some("B")], &[Some("Z")], &[Some("C")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(barcodes(result.table()), vec![Some("C"), Some("A"), Some("B")]);
        assert_eq!(result.stats().unmatched_entries, 1);
    }

    #[test]
    fn test_duplicate_entries_use_first_match() {
        let tickets = table(&["barcode"], &[&[Some("A1")], &[Some("A2")]]);
        let entries = table(
            &["Barcode", "gate"],
            &[
                &[Some("A1"), Some("north")],
                &[Some("A1"), Some("south")],
                &[Some("A1"), Some("east")],
            ],
        );

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(result.row_count(), 2);
        assert_eq!(result.table().cell(0, "gate"), Some("north"));
        assert_eq!(result.stats().duplicate_entries, 2);
    }

    #[test]
    fn test_unmatched_ticket_has_null_entry_columns() {
        let tickets = table(&["barcode"], &[&[Some("A9")]]);
        let entries = table(&["Barcode", "gate", "time"], &[&[Some("A1"), Some("n"), Some("19:00")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(result.entered(), &[false]);
        assert_eq!(result.table().cell(0, "Barcode"), None);
        assert_eq!(result.table().cell(0, "gate"), None);
        assert_eq!(result.table().cell(0, "time"), None);
    }

    #[test]
    fn test_exact_match_without_normalization() {
        let tickets = table(&["barcode"], &[&[Some("abc")], &[Some(" A1")]]);
        let entries = table(&["Barcode"], &[&[Some("ABC")], &[Some("A1")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(result.entered(), &[false, false]);
    }

    #[test]
    fn test_null_barcode_match_counts_as_not_entered() {
        let tickets = table(&["barcode"], &[&[None], &[Some("A1")]]);
        let entries = table(
            &["Barcode", "gate"],
            &[&[None, Some("west")], &[Some("A1"), Some("north")]],
        );

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        // null同士は結合されるが、Barcodeがnullなので未入場
        assert_eq!(result.table().cell(0, "gate"), Some("west"));
        assert_eq!(result.entered(), &[false, true]);
    }

    #[test]
    fn test_category_column_added_when_ticket_name_present() {
        let tickets = table(
            &["barcode", "ticketName"],
            &[
                &[Some("A1"), Some("מנוי שנתי")],
                &[Some("A2"), Some("כרטיס רגיל")],
                &[Some("A3"), None],
            ],
        );
        let entries = table(&["Barcode"], &[&[Some("A1")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(
            result.categories(),
            Some(&[Category::Season, Category::Regular, Category::Regular][..])
        );
        assert_eq!(result.table().cell(0, CATEGORY_COLUMN), Some("מנוי"));
        assert_eq!(result.table().cell(2, CATEGORY_COLUMN), Some("רגיל"));
    }

    #[test]
    fn test_ticket_name_from_entry_side_enables_categories() {
        let tickets = table(&["barcode"], &[&[Some("A1")], &[Some("A2")]]);
        let entries = table(&["Barcode", "ticketName"], &[&[Some("A1"), Some("מנוי")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(
            result.categories(),
            Some(&[Category::Season, Category::Regular][..])
        );
    }

    #[test]
    fn test_existing_derived_columns_are_overwritten() {
        // 前回の出力を入力し直したケース
        let tickets = table(
            &["barcode", ENTERED_COLUMN, "ticketName", CATEGORY_COLUMN],
            &[
                &[Some("A1"), Some("X"), Some("מנוי"), Some("רגיל")],
                &[Some("A2"), Some("X"), Some("כרטיס רגיל"), Some("מנוי")],
            ],
        );
        let entries = table(&["Barcode"], &[&[Some("A2")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(
            result.table().columns(),
            &["barcode", ENTERED_COLUMN, "ticketName", CATEGORY_COLUMN, "Barcode"]
        );
        assert_eq!(result.entered(), &[false, true]);
        assert_eq!(result.table().cell(0, ENTERED_COLUMN), Some("X"));
        assert_eq!(result.table().cell(1, ENTERED_COLUMN), Some("V"));
        assert_eq!(result.table().cell(0, CATEGORY_COLUMN), Some("מנוי"));
        assert_eq!(result.table().cell(1, CATEGORY_COLUMN), Some("רגיל"));
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let tickets = table(&["barcode", "date"], &[&[Some("A1"), Some("2024-01-01")]]);
        let entries = table(&["Barcode", "date"], &[&[Some("A1"), Some("2024-01-02")]]);

        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert_eq!(
            result.table().columns(),
            &["barcode", "date_x", "Barcode", "date_y", ENTERED_COLUMN]
        );
        assert_eq!(result.table().cell(0, "date_x"), Some("2024-01-01"));
        assert_eq!(result.table().cell(0, "date_y"), Some("2024-01-02"));
    }

    #[test]
    fn test_missing_key_columns() {
        let tickets = table(&["Barcode"], &[]);
        let entries = table(&["Barcode"], &[]);
        let err = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumn { ref column, role: FileRole::Issuance } if column == "barcode"
        ));

        let tickets = table(&["barcode"], &[]);
        let entries = table(&["barcode"], &[]);
        let err = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumn { ref column, role: FileRole::Entry } if column == "Barcode"
        ));
    }

    #[test]
    fn test_subsets() {
        let tickets = table(
            &["barcode", "ticketName"],
            &[
                &[Some("A1"), Some("מנוי")],
                &[Some("A2"), Some("רגיל")],
                &[Some("A3"), Some("מנוי")],
                &[Some("A4"), Some("רגיל")],
            ],
        );
        let entries = table(&["Barcode"], &[&[Some("A1")], &[Some("A2")]]);
        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        let pick = |s: Subset| {
            let t = result.subset(s).unwrap();
            let codes: Vec<String> = barcodes(&t)
                .into_iter()
                .map(|b| b.unwrap().to_string())
                .collect();
            codes
        };

        assert_eq!(pick(Subset::All), vec!["A1", "A2", "A3", "A4"]);
        assert_eq!(pick(Subset::Entered), vec!["A1", "A2"]);
        assert_eq!(pick(Subset::NotEntered), vec!["A3", "A4"]);
        assert_eq!(pick(Subset::EnteredSeason), vec!["A1"]);
        assert_eq!(pick(Subset::EnteredRegular), vec!["A2"]);
        assert_eq!(pick(Subset::NotEnteredSeason), vec!["A3"]);
        assert_eq!(pick(Subset::NotEnteredRegular), vec!["A4"]);
    }

    #[test]
    fn test_category_subsets_unavailable_without_ticket_name() {
        let tickets = table(&["barcode"], &[&[Some("A1")]]);
        let entries = table(&["Barcode"], &[]);
        let result = reconcile(&tickets, &entries, &CategoryClassifier::default()).unwrap();

        assert!(result.subset(Subset::Entered).is_some());
        assert!(result.subset(Subset::EnteredSeason).is_none());
        assert!(result.subset(Subset::NotEnteredRegular).is_none());
    }
}
