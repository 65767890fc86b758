//! Word (.docx) 出力
//!
//! 最小構成のOOXMLパッケージ（Content_Types / rels / document.xml）をzipで組み立てる。

use scan_review_common::export::document_core::{build_document_lines, DocumentLine};
use scan_review_common::{ExportError, ExportRequest, OutputFormat};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

fn docx_err(message: impl Into<String>) -> ExportError {
    ExportError::encoding(OutputFormat::Word, message)
}

/// XML特殊文字のエスケープ（XML 1.0で使えない制御文字は落とす）
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// 1段落分のXML（size は半ポイント単位）
fn paragraph(text: &str, half_points: u32, bold: bool, italic: bool, color: Option<&str>) -> String {
    let mut props = String::new();
    if bold {
        props.push_str("<w:b/>");
    }
    if italic {
        props.push_str("<w:i/>");
    }
    if let Some(color) = color {
        props.push_str(&format!(r#"<w:color w:val="{}"/>"#, color));
    }
    props.push_str(&format!(r#"<w:sz w:val="{}"/>"#, half_points));

    // 改行は <w:br/> で区切る
    let runs: Vec<String> = text
        .split('\n')
        .map(|part| format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(part)))
        .collect();
    format!(
        "<w:p><w:r><w:rPr>{}</w:rPr>{}</w:r></w:p>",
        props,
        runs.join("<w:br/>")
    )
}

fn line_xml(line: &DocumentLine) -> String {
    match line {
        DocumentLine::Title(t) => paragraph(t, 36, true, false, None),
        DocumentLine::Meta(t) => paragraph(t, 18, false, false, Some("6B7280")),
        DocumentLine::Label(t) => paragraph(t, 18, true, false, Some("6B7280")),
        DocumentLine::Note(t) => paragraph(t, 18, false, true, Some("B45309")),
        DocumentLine::Value(t) => paragraph(t, 24, false, false, None),
        DocumentLine::Placeholder(t) => paragraph(t, 24, false, true, Some("9CA3AF")),
        DocumentLine::Spacer => "<w:p/>".to_string(),
    }
}

/// word/document.xml の本文
pub fn document_xml(request: &ExportRequest) -> String {
    let body: String = build_document_lines(request).iter().map(line_xml).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        body
    )
}

/// .docx をバイト列として生成
pub fn generate_docx(request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("word/document.xml", document_xml(request)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)
            .map_err(|e| docx_err(format!("{}: {}", name, e)))?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish().map_err(|e| docx_err(e.to_string()))?;
    Ok(cursor.into_inner())
}
