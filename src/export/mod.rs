pub mod pdf;
pub mod word;

use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use scan_review_common::export::text_core::render_text;
use scan_review_common::{
    ExportArtifact, ExportError, ExportOptions, ExportRequest, Exporter, Notice, OutputFormat,
    ReviewSurface,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 4形式すべてに対応するエクスポーター
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter;

impl Exporter for DocumentExporter {
    fn export(&self, request: &ExportRequest) -> std::result::Result<ExportArtifact, ExportError> {
        let bytes = match request.format {
            OutputFormat::Excel => scan_review_common::export::excel_buffer(request)?,
            OutputFormat::Word => word::generate_docx(request)?,
            OutputFormat::Pdf => pdf::generate_pdf_bytes(request)?,
            OutputFormat::Text => render_text(request).into_bytes(),
        };
        Ok(ExportArtifact::new(request, bytes))
    }
}

/// 出力先の決定
///
/// ディレクトリまたは拡張子なしのパスなら `<dir>/<ファイル名>`、それ以外はそのまま。
pub fn output_path_for(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

/// 成果物をファイルに書き出す
pub fn write_artifact(
    artifact: &ExportArtifact,
    output: &Path,
) -> std::result::Result<PathBuf, ExportError> {
    let path = output_path_for(output, &artifact.file_name);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, &artifact.bytes)?;
    tracing::debug!(path = %path.display(), sha256 = %artifact.sha256, "artifact written");
    Ok(path)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// エクスポートの成果物と保存先（保存した場合）
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub artifact: ExportArtifact,
    pub path: Option<PathBuf>,
}

/// エンコード（と指定があれば保存）をブロッキングスレッドで行う
///
/// 保存の失敗もエクスポートの失敗として通知する。
async fn run_job(
    surface: &mut ReviewSurface,
    options: &ExportOptions,
    output: Option<PathBuf>,
) -> (std::result::Result<ExportOutcome, ExportError>, Notice) {
    let request = match surface.begin_export(options) {
        Ok(request) => request,
        Err(err) => {
            let notice = Notice::error("Export Failed", err.to_string());
            return (Err(err), notice);
        }
    };

    let format = request.format;
    let pb = spinner(format!("{}を生成中...", format.display_name()));
    let job = tokio::task::spawn_blocking(
        move || -> std::result::Result<ExportOutcome, ExportError> {
            let artifact = DocumentExporter.export(&request)?;
            let path = match output {
                Some(output) => Some(write_artifact(&artifact, &output)?),
                None => None,
            };
            Ok(ExportOutcome { artifact, path })
        },
    );
    let result = match job.await {
        Ok(result) => result,
        Err(e) => Err(ExportError::encoding(
            format,
            format!("export task panicked: {}", e),
        )),
    };
    pb.finish_and_clear();

    let notice = surface.finish_export(result.as_ref().map(|outcome| &outcome.artifact));
    (result, notice)
}

/// エクスポートを実行（エンコードのみ）
///
/// 実行中は画面の編集を受け付けないよう、開始時点のスナップショットだけを渡す。
pub async fn run_export(
    surface: &mut ReviewSurface,
    options: &ExportOptions,
) -> (std::result::Result<ExportArtifact, ExportError>, Notice) {
    let (result, notice) = run_job(surface, options, None).await;
    (result.map(|outcome| outcome.artifact), notice)
}

/// エクスポートしてファイルに保存
pub async fn run_export_to(
    surface: &mut ReviewSurface,
    options: &ExportOptions,
    output: &Path,
) -> (std::result::Result<ExportOutcome, ExportError>, Notice) {
    run_job(surface, options, Some(output.to_path_buf())).await
}

/// エクスポートして保存し、通知を表示する
pub async fn export_to_path(
    surface: &mut ReviewSurface,
    options: &ExportOptions,
    output: &Path,
) -> Result<PathBuf> {
    let (result, notice) = run_export_to(surface, options, output).await;
    print_notice(&notice);
    let outcome = result?;
    let path = outcome.path.unwrap_or_else(|| output.to_path_buf());
    println!("✔ {}出力: {}", outcome.artifact.format.display_name(), path.display());
    Ok(path)
}

pub fn print_notice(notice: &Notice) {
    match notice.kind {
        scan_review_common::NoticeKind::Success => {
            println!("✔ {}: {}", notice.title, notice.description)
        }
        scan_review_common::NoticeKind::Error => {
            eprintln!("✖ {}: {}", notice.title, notice.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_directory_like() {
        let path = output_path_for(Path::new("out"), "scan.pdf");
        assert_eq!(path, PathBuf::from("out/scan.pdf"));
    }

    #[test]
    fn test_output_path_for_explicit_file() {
        let path = output_path_for(Path::new("out/report.xlsx"), "scan.xlsx");
        assert_eq!(path, PathBuf::from("out/report.xlsx"));
    }
}
