use crate::cli::ExportFormat;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ticket_entry_common::{CategoryClassifier, DEFAULT_SEASON_MARKER};

/// 定期券マーカーを上書きする環境変数
pub const SEASON_MARKER_ENV: &str = "TICKET_ENTRY_SEASON_MARKER";

/// 出力先の既定ディレクトリ
pub const DEFAULT_OUTPUT_DIR: &str = "ticket-report";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub season_marker: String,
    pub export_format: ExportFormat,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            season_marker: DEFAULT_SEASON_MARKER.into(),
            export_format: ExportFormat::Both,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読めない設定ファイルは警告して既定値で続行する
    ///
    /// `config` サブコマンド用。保存し直せば壊れたファイルは上書きされる。
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_from_or_default(&Self::config_path()?))
    }

    pub fn load_from_or_default(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            tracing::warn!(
                path = %config_path.display(),
                error = %e,
                "config file unreadable; using defaults"
            );
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("תיקיית הבית לא נמצאה".into()))?;
        Ok(home.join(".config").join("ticket-entry").join("config.json"))
    }

    /// 定期券マーカー（引数 > 環境変数 > 設定ファイル）
    pub fn season_marker(&self, cli_override: Option<&str>) -> String {
        if let Some(marker) = cli_override {
            return marker.to_string();
        }
        // 環境変数を優先
        if let Ok(marker) = std::env::var(SEASON_MARKER_ENV) {
            if !marker.is_empty() {
                return marker;
            }
        }
        self.season_marker.clone()
    }

    /// `config --show` の表示行
    ///
    /// マーカーは保存値を出し、環境変数で上書きされている場合は別行で示す。
    pub fn show_lines(&self, config_path: &Path, env_override: Option<&str>) -> Vec<String> {
        let mut lines = vec![
            "הגדרות:".to_string(),
            format!("  קובץ: {}", config_path.display()),
            format!("  מחרוזת מנוי: {}", self.season_marker),
        ];
        if let Some(marker) = env_override.filter(|m| !m.is_empty()) {
            lines.push(format!("    (נדרס ע״י {}: {})", SEASON_MARKER_ENV, marker));
        }
        lines.push(format!("  פורמט ייצוא: {}", self.export_format));
        lines.push(format!(
            "  תיקיית פלט: {}",
            self.output_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
        ));
        lines
    }

    pub fn classifier(&self, cli_override: Option<&str>) -> Result<CategoryClassifier> {
        Ok(CategoryClassifier::new(self.season_marker(cli_override))?)
    }

    pub fn set_season_marker(&mut self, marker: String) -> Result<()> {
        // 空マーカーは保存前に弾く
        CategoryClassifier::new(marker.as_str())?;
        self.season_marker = marker;
        self.save()
    }
}
