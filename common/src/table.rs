//! 表データモジュール
//!
//! CSV/Excelから読み込んだ表を列名＋行の組で保持する。
//! セル値は `Option<String>` で、`None` が空セル（null）を表す。

use crate::error::{Error, Result};
use std::fmt;

/// 発券ファイルの結合キー列
pub const TICKET_BARCODE_COLUMN: &str = "barcode";
/// 入場ファイルの結合キー列（大文字始まり）
pub const ENTRY_BARCODE_COLUMN: &str = "Barcode";
/// 券種名の列（任意）
pub const TICKET_NAME_COLUMN: &str = "ticketName";
/// 販売経路の列（任意、空なら招待券）
pub const ORIGIN_COLUMN: &str = "origin";

/// 入力ファイルの論理的な役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// 発券データ（1行 = 1枚）
    Issuance,
    /// 入場スキャンデータ（1行 = 1回の入場）
    Entry,
}

impl FileRole {
    /// ログ・JSON用の識別子
    pub fn id(&self) -> &'static str {
        match self {
            FileRole::Issuance => "issuance",
            FileRole::Entry => "entry",
        }
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            FileRole::Issuance => "קובץ הכרטיסים הראשי",
            FileRole::Entry => "קובץ נתוני הכניסה",
        }
    }

    /// この役割で必須となるキー列
    pub fn key_column(&self) -> &'static str {
        match self {
            FileRole::Issuance => TICKET_BARCODE_COLUMN,
            FileRole::Entry => ENTRY_BARCODE_COLUMN,
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 列名と行データからなる表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 行を追加する
    ///
    /// 列数に満たない行は null で埋め、超過分は切り捨てる。
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.columns.len(), None);
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名から列番号を取得（大文字小文字を区別）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// セル値を取得。列がない・セルが空の場合は `None`
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// 指定列の値を行順に返す
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(col).and_then(|c| c.as_deref()))
    }

    /// 必須列の存在を確認し、列番号を返す
    pub fn require_column(&self, column: &str, role: FileRole) -> Result<usize> {
        self.column_index(column).ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
            role,
        })
    }

    /// 役割ごとのキー列を確認する
    pub fn require_key_column(&self, role: FileRole) -> Result<usize> {
        self.require_column(role.key_column(), role)
    }

    /// 条件に合う行だけを取り出した表を作る
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(usize) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, _)| keep(*i))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }

    /// 列を設定する（値は行数分必要）
    ///
    /// 同名の列があればその位置で値を置き換え、なければ末尾に追加する。
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<Option<String>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }
}
