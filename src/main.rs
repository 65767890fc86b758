use clap::Parser;
use scan_review::{cli, config, error, export, logging, original, review, session};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use scan_review_common::ReviewSurface;
use session::SessionContext;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = logging::LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone())
        .with_log_values(cli.log_values);
    logging::init_logging(&log_config)?;

    let session = SessionContext::open(Config::load()?);
    let result = run(cli.command, &session).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    session.close();
    result
}

fn export_dir(output: Option<PathBuf>, config: &Config) -> PathBuf {
    output
        .or_else(|| config.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn run(command: Commands, session: &SessionContext) -> Result<()> {
    match command {
        Commands::Show { input, format, raw } => {
            let scan = review::load_scan_result(&input, raw)?;
            let surface = ReviewSurface::new(scan, session.format_or_default(format));
            println!(
                "📄 {} (信頼度 {}%)",
                surface.explanation(),
                surface.overall_confidence()
            );
            review::print_view(&surface.view());
        }

        Commands::Review { input, format, output, raw } => {
            println!("📝 scan-review - レビュー ({})\n", session.operator);
            let scan = review::load_scan_result(&input, raw)?;
            let mut surface = ReviewSurface::new(scan, session.format_or_default(format));
            let output_dir = export_dir(output, &session.config);
            review::run_interactive_review(&mut surface, session, &output_dir).await?;
        }

        Commands::Apply { input, script, format, output, raw } => {
            println!("✏️  scan-review - 編集スクリプト適用\n");
            let scan = review::load_scan_result(&input, raw)?;
            let commands = review::load_script(&script)?;
            let mut surface = ReviewSurface::new(scan, session.format_or_default(format));

            println!("- {}件の操作を適用中...", commands.len());
            let summary = review::apply_commands(&mut surface, &commands)?;
            println!(
                "✔ 適用: {}件 / 変更: {}件 / 元に戻す: {}件",
                summary.applied, summary.changed, summary.undone
            );

            match output {
                Some(path) => {
                    let snapshot = review::ReviewSnapshot::capture(&surface);
                    std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
                    println!("✔ 結果を保存: {}", path.display());
                }
                None => review::print_view(&surface.view()),
            }
        }

        Commands::Export { input, format, output, title, script, raw } => {
            println!("📄 scan-review - エクスポート\n");
            let scan = review::load_scan_result(&input, raw)?;
            let mut surface = ReviewSurface::new(scan, session.format_or_default(format));

            if let Some(script) = script {
                let commands = review::load_script(&script)?;
                review::apply_commands(&mut surface, &commands)?;
                println!("✔ 編集スクリプトを適用: {}件", commands.len());
            }

            let options = session.export_options(title.as_deref());
            let output_dir = export_dir(output, &session.config);
            export::export_to_path(&mut surface, &options, &output_dir).await?;

            println!("\n✅ 完了");
        }

        Commands::Original { input, output } => {
            let scan = review::load_scan_result(&input, false)?;
            let path = original::save_original(&scan.original_image, &output)?;
            println!("✔ 元画像を保存: {}", path.display());
        }

        Commands::Config { set_default_format, set_operator, show } => {
            let mut config = session.config.clone();

            if let Some(format) = set_default_format {
                config.set_default_format(format)?;
                println!("✔ 既定の形式を設定しました: {}", format.display_name());
            }

            if let Some(name) = set_operator {
                config.set_operator(name)?;
                println!("✔ 作業者名を設定しました");
            }

            if show {
                println!("設定 ({}):", Config::config_path()?.display());
                println!("  既定の形式: {}", config.default_format.display_name());
                println!("  タイトル: {}", config.title);
                println!(
                    "  出力先: {}",
                    config
                        .export_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".to_string())
                );
                println!("  作業者: {}", config.operator());
            }
        }
    }

    Ok(())
}
