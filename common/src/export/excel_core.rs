//! Excel生成（共通ライブラリ）
//!
//! 1シートに「Field / Value / Confidence / Notes」の表を書き出す。
//! 1項目が1行。信頼度セルは区分ごとに色分けする。

use super::{ExportError, ExportRequest};
use crate::format::OutputFormat;
use crate::types::ConfidenceBand;
use crate::view::EMPTY_PLACEHOLDER;
use rust_xlsxwriter::*;

const SHEET_NAME: &str = "Review";
const HEADERS: [&str; 4] = ["Field", "Value", "Confidence", "Notes"];

fn xlsx_err(context: &str, err: XlsxError) -> ExportError {
    ExportError::encoding(OutputFormat::Excel, format!("{}: {}", context, err))
}

fn band_format(band: ConfidenceBand) -> Format {
    let (font, background) = match band {
        ConfidenceBand::High => (0x166534, 0xDCFCE7),
        ConfidenceBand::Medium => (0x854D0E, 0xFEF9C3),
        ConfidenceBand::Low => (0x991B1B, 0xFEE2E2),
    };
    Format::new()
        .set_align(FormatAlign::Center)
        .set_font_color(Color::RGB(font))
        .set_background_color(Color::RGB(background))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC))
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let label_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let value_format = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let note_format = Format::new()
        .set_italic()
        .set_font_color(Color::RGB(0x854D0E))
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| xlsx_err("シート名設定エラー", e))?;

    for (col, width) in [(0u16, 24.0), (1, 48.0), (2, 12.0), (3, 40.0)] {
        worksheet
            .set_column_width(col, width)
            .map_err(|e| xlsx_err("列幅設定エラー", e))?;
    }

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| xlsx_err("ヘッダー書き込みエラー", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| xlsx_err("ウィンドウ枠固定エラー", e))?;

    if request.fields.is_empty() {
        worksheet
            .write_string(1, 0, EMPTY_PLACEHOLDER)
            .map_err(|e| xlsx_err("プレースホルダー書き込みエラー", e))?;
    }

    for (index, field) in request.fields.iter().enumerate() {
        let row = index as u32 + 1;

        worksheet
            .write_string_with_format(row, 0, &field.field, &label_format)
            .map_err(|e| xlsx_err("ラベル書き込みエラー", e))?;
        worksheet
            .write_string_with_format(row, 1, &field.value, &value_format)
            .map_err(|e| xlsx_err("値書き込みエラー", e))?;
        worksheet
            .write_number_with_format(row, 2, f64::from(field.confidence), &band_format(field.band()))
            .map_err(|e| xlsx_err("信頼度書き込みエラー", e))?;

        if let Some(note) = request.note(index) {
            worksheet
                .write_string_with_format(row, 3, note, &note_format)
                .map_err(|e| xlsx_err("メモ書き込みエラー", e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| xlsx_err("Excel保存エラー", e))
}
