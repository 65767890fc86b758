use printpdf::*;
use scan_review_common::export::document_core::{build_document_lines, PageLayout};
use scan_review_common::{ExportError, ExportRequest, OutputFormat};

fn pdf_err(message: impl Into<String>) -> ExportError {
    ExportError::encoding(OutputFormat::Pdf, message)
}

/// PDFをバイト列として生成
pub fn generate_pdf_bytes(request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    let layout = PageLayout::default();
    let pages = layout.paginate(&build_document_lines(request));

    let (doc, page1, layer1) = PdfDocument::new(
        &request.title,
        Mm(layout.page_width_mm),
        Mm(layout.page_height_mm),
        "Layer 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_err(format!("フォント追加エラー: {:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_err(format!("フォント追加エラー: {:?}", e)))?;

    for (page_no, lines) in pages.iter().enumerate() {
        let layer = if page_no == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page, layer) = doc.add_page(
                Mm(layout.page_width_mm),
                Mm(layout.page_height_mm),
                "Layer 1",
            );
            doc.get_page(page).get_layer(layer)
        };

        for line in lines {
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                line.text.clone(),
                line.font_size_pt,
                Mm(layout.margin_mm),
                Mm(line.y_mm),
                font,
            );
        }
    }

    tracing::debug!(pages = pages.len(), "pdf laid out");
    doc.save_to_bytes()
        .map_err(|e| pdf_err(format!("PDF保存エラー: {:?}", e)))
}
