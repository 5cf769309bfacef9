use clap::Parser;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;
use ticket_entry::{analysis, cli, config, error, export};
use analysis::AnalysisRequest;
use cli::{Cli, Commands};
use config::{Config, DEFAULT_OUTPUT_DIR, SEASON_MARKER_ENV};
use error::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();
}

/// 進捗行。`--json` のときは標準出力をJSONだけにするため stderr へ出す
fn progress(json: bool, message: impl Display) {
    if json {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze { tickets, entries, output, format, marker, no_export, json } => {
            let config = Config::load()?;
            progress(json, "🎟️ ticket-entry - ניתוח כרטיסים\n");

            let request = AnalysisRequest {
                tickets,
                entries,
                classifier: config.classifier(marker.as_deref())?,
            };

            progress(json, "[1/2] טוען ומצליב קבצים...");
            let report = analysis::run_analysis(&request)?;
            progress(
                json,
                format!("✔ {} כרטיסים נותחו\n", report.metrics().totals().total_tickets),
            );

            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("📊 תוצאות ניתוח כרטיסים");
                print!("{}", report.summary_text());
                println!("\n{}", report.metrics().headline());
            }

            if !no_export {
                let format = format.unwrap_or(config.export_format);
                let output_dir = output
                    .or_else(|| config.output_dir.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

                progress(json, format!("\n[2/2] מייצא ({})...", format));
                let written = export::export_report(&report, &format, &output_dir)?;
                for path in &written {
                    progress(json, format!("  - {}", path.display()));
                }
                progress(json, format!("✔ נשמר: {}", output_dir.display()));
            }

            progress(json, "\n✅ הניתוח הושלם");
        }

        Commands::Summary { tickets, entries, marker, output } => {
            let config = Config::load()?;
            let request = AnalysisRequest {
                tickets,
                entries,
                classifier: config.classifier(marker.as_deref())?,
            };
            let report = analysis::run_analysis(&request)?;

            match output {
                Some(path) => {
                    export::write_summary_text(&report, &path)?;
                    println!("✔ הסיכום נשמר: {}", path.display());
                }
                None => print!("{}", report.summary_text()),
            }
        }

        Commands::Config { set_marker, show } => {
            // 壊れた設定ファイルでも --set-marker で書き直せるようにする
            let mut config = Config::load_or_default()?;

            if let Some(marker) = set_marker {
                config.set_season_marker(marker)?;
                println!("✔ מחרוזת המנוי עודכנה");
            }

            if show {
                let env_marker = std::env::var(SEASON_MARKER_ENV).ok();
                for line in config.show_lines(&Config::config_path()?, env_marker.as_deref()) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
