//! コマンドライン統合テスト
//!
//! ビルド済みバイナリを起動し、標準出力の内容を検証する。
//! HOME を一時ディレクトリに向け、利用者の設定ファイルには触れない。

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("テストファイル作成失敗");
    path
}

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ticket-entry"))
        .args(args)
        .env("HOME", home)
        .env_remove("TICKET_ENTRY_SEASON_MARKER")
        .env_remove("RUST_LOG")
        .output()
        .expect("バイナリ起動失敗")
}

fn config_file(home: &Path) -> PathBuf {
    home.join(".config").join("ticket-entry").join("config.json")
}

/// --json 指定時は標準出力全体がJSONとして読める
#[test]
fn test_analyze_json_stdout_is_pure_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let tickets = write(dir.path(), "viv.csv", "barcode\nA1\nA2\nA3\n");
    let entries = write(dir.path(), "fortress.csv", "Barcode\nA1\nA3\n");

    let output = run(
        dir.path(),
        &[
            "analyze",
            tickets.to_str().unwrap(),
            entries.to_str().unwrap(),
            "--json",
            "--no-export",
        ],
    );

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["metrics"]["totals"]["total_entered"], 2);
    assert_eq!(json["metrics"]["totals"]["entry_rate"], 66.7);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[1/2]"));
}

/// 書き出しを伴っても --json の標準出力はJSONのみ
#[test]
fn test_analyze_json_with_export() {
    let dir = tempdir().expect("Failed to create temp dir");
    let tickets = write(dir.path(), "viv.csv", "barcode\nA1\nA2\n");
    let entries = write(dir.path(), "fortress.csv", "Barcode\nA2\n");
    let out_dir = dir.path().join("report");

    let output = run(
        dir.path(),
        &[
            "analyze",
            tickets.to_str().unwrap(),
            entries.to_str().unwrap(),
            "--json",
            "--format",
            "csv",
            "--output",
            out_dir.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["metrics"]["totals"]["entry_rate"], 50.0);
    assert!(out_dir.exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[2/2]"));
}

/// 壊れた設定ファイルがあっても config --set-marker で書き直せる
#[test]
fn test_set_marker_repairs_corrupt_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = config_file(dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let output = run(dir.path(), &["config", "--set-marker", "Season"]);
    assert!(output.status.success());

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["season_marker"], "Season");
}

/// config --show は保存値を表示し、環境変数の上書きは別行で示す
#[test]
fn test_show_separates_env_override() {
    let dir = tempdir().expect("Failed to create temp dir");
    let set = run(dir.path(), &["config", "--set-marker", "Season"]);
    assert!(set.status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_ticket-entry"))
        .args(["config", "--show"])
        .env("HOME", dir.path())
        .env("TICKET_ENTRY_SEASON_MARKER", "VIP")
        .output()
        .expect("バイナリ起動失敗");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("מחרוזת מנוי: Season"));
    assert!(!stdout.contains("מחרוזת מנוי: VIP"));
    assert!(stdout
        .lines()
        .any(|l| l.contains("TICKET_ENTRY_SEASON_MARKER") && l.contains("VIP")));
}
