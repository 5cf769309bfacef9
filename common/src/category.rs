//! 券種分類モジュール
//!
//! 券種名（ticketName）に定期券マーカーが含まれるかで
//! 通常券／定期券（シーズンチケット）を判定する。

use crate::error::{Error, Result};

/// 既定の定期券マーカー
pub const DEFAULT_SEASON_MARKER: &str = "מנוי";

/// 券種区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Regular,
    Season,
}

impl Category {
    /// 出力表に書き込む表示名
    pub fn label(&self) -> &'static str {
        match self {
            Category::Regular => "רגיל",
            Category::Season => "מנוי",
        }
    }
}

/// 部分文字列マッチによる券種判定器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClassifier {
    season_marker: String,
}

impl CategoryClassifier {
    /// マーカーを指定して作成。空文字は全行が一致してしまうため拒否する
    pub fn new(season_marker: impl Into<String>) -> Result<Self> {
        let season_marker = season_marker.into();
        if season_marker.is_empty() {
            return Err(Error::Config("season marker must not be empty".into()));
        }
        Ok(Self { season_marker })
    }

    pub fn season_marker(&self) -> &str {
        &self.season_marker
    }

    /// 1セル分の判定。空セルは通常券
    pub fn classify(&self, ticket_name: Option<&str>) -> Category {
        match ticket_name {
            Some(name) if name.contains(self.season_marker.as_str()) => Category::Season,
            _ => Category::Regular,
        }
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self {
            season_marker: DEFAULT_SEASON_MARKER.to_string(),
        }
    }
}
