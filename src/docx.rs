use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::result::ZipError;
use zip::{CompressionMethod, ZipWriter};

use crate::block::{Block, ListKind, Run};
use crate::config::Config;
use crate::error::Result;

/// Usable width of a Letter page with one-inch margins, in twentieths of a point.
const TEXT_WIDTH_TWIPS: usize = 9360;

const BULLET_NUM_ID: u32 = 1;
const DECIMAL_NUM_ID: u32 = 2;

/// Package blocks as a complete `.docx` archive.
pub fn blocks_to_docx(blocks: &[Block], config: &Config, title: Option<&str>) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opt = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", RELS_XML.to_string()),
        ("docProps/core.xml", core_xml(title)),
        ("word/document.xml", blocks_to_document_xml(blocks, config)),
        ("word/styles.xml", styles_xml(config)),
        ("word/numbering.xml", NUMBERING_XML.to_string()),
        ("word/_rels/document.xml.rels", WORD_RELS_XML.to_string()),
    ];
    for (name, xml) in parts {
        zip.start_file(name, opt)?;
        zip.write_all(xml.as_bytes()).map_err(ZipError::from)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Render blocks as the `word/document.xml` part.
pub fn blocks_to_document_xml(blocks: &[Block], config: &Config) -> String {
    let mut body = String::new();
    for block in blocks {
        emit_block(block, config, &mut body);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body>
</w:document>"#
    )
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            open_paragraph(&format!("Heading{level}"), out);
            emit_run(&Run::plain(text.as_str()), out);
            out.push_str("</w:p>");
        }
        Block::Paragraph { runs } => {
            out.push_str("<w:p>");
            emit_runs(runs, out);
            out.push_str("</w:p>");
        }
        Block::ListItem { kind, runs } => {
            let style = match kind {
                ListKind::Bullet => "ListBullet",
                ListKind::Numbered => "ListNumber",
            };
            open_paragraph(style, out);
            emit_runs(runs, out);
            out.push_str("</w:p>");
        }
        Block::CodeBlock { lines } => {
            open_paragraph("IntenseQuote", out);
            emit_code_run(lines, config, out);
            out.push_str("</w:p>");
        }
        Block::Table { header, rows } => table_to_xml(header, rows, config, out),
    }
}

fn open_paragraph(style: &str, out: &mut String) {
    out.push_str("<w:p><w:pPr><w:pStyle w:val=\"");
    out.push_str(style);
    out.push_str("\"/></w:pPr>");
}

fn emit_runs(runs: &[Run], out: &mut String) {
    for run in runs {
        emit_run(run, out);
    }
}

fn emit_run(run: &Run, out: &mut String) {
    out.push_str("<w:r>");
    if run.bold {
        out.push_str("<w:rPr><w:b/><w:bCs/></w:rPr>");
    }
    emit_text(&run.text, out);
    out.push_str("</w:r>");
}

fn emit_text(text: &str, out: &mut String) {
    out.push_str("<w:t xml:space=\"preserve\">");
    out.push_str(&escape(text));
    out.push_str("</w:t>");
}

/// One monospace run with a line break between source lines.
fn emit_code_run(lines: &[String], config: &Config, out: &mut String) {
    let font = escape(config.font.code.as_str());
    let size = config.font.code_half_points();
    out.push_str(&format!(
        "<w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/><w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/></w:rPr>"
    ));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        emit_text(line, out);
    }
    out.push_str("</w:r>");
}

fn table_to_xml(header: &[String], rows: &[Vec<String>], config: &Config, out: &mut String) {
    let col_count = header.len();
    if col_count == 0 {
        return;
    }
    let col_width = TEXT_WIDTH_TWIPS / col_count;

    out.push_str(&format!(
        "<w:tbl><w:tblPr><w:tblStyle w:val=\"{}\"/><w:tblW w:w=\"0\" w:type=\"auto\"/><w:tblLook w:val=\"04A0\" w:firstRow=\"1\" w:lastRow=\"0\" w:firstColumn=\"1\" w:lastColumn=\"0\" w:noHBand=\"0\" w:noVBand=\"1\"/></w:tblPr><w:tblGrid>",
        escape(config.table.style_id().as_str())
    ));
    for _ in 0..col_count {
        out.push_str(&format!("<w:gridCol w:w=\"{col_width}\"/>"));
    }
    out.push_str("</w:tblGrid>");

    // Header cells (bold)
    out.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
    for cell in header {
        emit_cell(Some(&Run::bold(cell.as_str())), col_width, out);
    }
    out.push_str("</w:tr>");

    // Data rows, fitted to the header's column count
    for row in rows {
        out.push_str("<w:tr>");
        for i in 0..col_count {
            let run = row
                .get(i)
                .filter(|text| !text.is_empty())
                .map(|text| Run::plain(text.as_str()));
            emit_cell(run.as_ref(), col_width, out);
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
}

fn emit_cell(run: Option<&Run>, width: usize, out: &mut String) {
    out.push_str(&format!(
        "<w:tc><w:tcPr><w:tcW w:w=\"{width}\" w:type=\"dxa\"/></w:tcPr><w:p>"
    ));
    if let Some(run) = run {
        emit_run(run, out);
    }
    out.push_str("</w:p></w:tc>");
}

/// Render the `word/styles.xml` part.
pub fn styles_xml(config: &Config) -> String {
    let body_font = escape(config.font.body.as_str());
    let body_size = config.font.body_half_points();
    let accent = escape(config.table.accent.as_str());
    let style_id = config.table.style_id();
    let table_id = escape(style_id.as_str());
    let table_name = escape(config.table.style.as_str());

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);

    out.push_str(&format!(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{body_font}" w:hAnsi="{body_font}" w:eastAsia="{body_font}" w:cs="{body_font}"/><w:sz w:val="{body_size}"/><w:szCs w:val="{body_size}"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="200" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#
    ));

    out.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#);

    // Heading 1 through 4, sizes in half-points
    for (level, size) in [(1, 28), (2, 26), (3, 24), (4, 22)] {
        out.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="{before}" w:after="0"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="{accent}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:style>"#,
            before = if level == 1 { 480 } else { 200 },
            outline = level - 1,
        ));
    }

    for (id, name, num_id) in [
        ("ListBullet", "List Bullet", BULLET_NUM_ID),
        ("ListNumber", "List Number", DECIMAL_NUM_ID),
    ] {
        out.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="{num_id}"/></w:numPr><w:contextualSpacing/></w:pPr></w:style>"#
        ));
    }

    out.push_str(&format!(
        r#"<w:style w:type="paragraph" w:styleId="IntenseQuote"><w:name w:val="Intense Quote"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="4" w:space="4" w:color="{accent}"/></w:pBdr><w:spacing w:before="200" w:after="280"/><w:ind w:left="936" w:right="936"/></w:pPr><w:rPr><w:b/><w:bCs/><w:i/><w:iCs/><w:color w:val="{accent}"/></w:rPr></w:style>"#
    ));

    out.push_str(&format!(
        r#"<w:style w:type="table" w:styleId="{table_id}"><w:name w:val="{table_name}"/><w:uiPriority w:val="62"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:tblPr><w:tblStyleRowBandSize w:val="1"/><w:tblStyleColBandSize w:val="1"/><w:tblBorders><w:top w:val="single" w:sz="8" w:space="0" w:color="{accent}"/><w:left w:val="single" w:sz="8" w:space="0" w:color="{accent}"/><w:bottom w:val="single" w:sz="8" w:space="0" w:color="{accent}"/><w:right w:val="single" w:sz="8" w:space="0" w:color="{accent}"/><w:insideH w:val="single" w:sz="8" w:space="0" w:color="{accent}"/><w:insideV w:val="single" w:sz="8" w:space="0" w:color="{accent}"/></w:tblBorders><w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr><w:tblStylePr w:type="firstRow"><w:rPr><w:b/><w:bCs/></w:rPr><w:tblPr/><w:tcPr><w:tcBorders><w:bottom w:val="single" w:sz="18" w:space="0" w:color="{accent}"/></w:tcBorders></w:tcPr></w:tblStylePr></w:style>"#
    ));

    out.push_str("</w:styles>");
    out
}

fn core_xml(title: Option<&str>) -> String {
    let title = title
        .map(|t| format!("<dc:title>{}</dc:title>", escape(t)))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{title}<dc:creator>md2docx</dc:creator></cp:coreProperties>"#
    )
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const WORD_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

// numId 1 is the bullet list, numId 2 the decimal list
const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:pStyle w:val="ListBullet"/><w:lvlText w:val="&#8226;"/><w:lvlJc w:val="left"/><w:pPr><w:tabs><w:tab w:val="num" w:pos="360"/></w:tabs><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
  <w:abstractNum w:abstractNumId="1"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:pStyle w:val="ListNumber"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:tabs><w:tab w:val="num" w:pos="360"/></w:tabs><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use std::io::Read;
    use zip::ZipArchive;

    fn document(md: &str) -> String {
        blocks_to_document_xml(&parse(md), &Config::default())
    }

    #[test]
    fn heading_uses_builtin_style() {
        let xml = document("## Results");
        assert!(xml.contains(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t xml:space="preserve">Results</w:t></w:r></w:p>"#
        ));
    }

    #[test]
    fn paragraph_runs_and_escaping() {
        let xml = document("**Tom & Jerry** <3");
        assert!(xml.contains(
            r#"<w:p><w:r><w:rPr><w:b/><w:bCs/></w:rPr><w:t xml:space="preserve">Tom &amp; Jerry</w:t></w:r><w:r><w:t xml:space="preserve"> &lt;3</w:t></w:r></w:p>"#
        ));
    }

    #[test]
    fn list_items_use_list_styles() {
        let xml = document("- one\n1. two");
        assert!(xml.contains(r#"<w:pStyle w:val="ListBullet"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="ListNumber"/>"#));
    }

    #[test]
    fn code_block_is_monospace_with_breaks() {
        let xml = document("```\nlet a = 1;\n  let b = 2;\n```");
        assert!(xml.contains(r#"<w:pStyle w:val="IntenseQuote"/>"#));
        assert!(xml.contains(r#"<w:rFonts w:ascii="Courier New" w:hAnsi="Courier New" w:cs="Courier New"/><w:sz w:val="20"/>"#));
        assert!(xml.contains(
            r#"<w:t xml:space="preserve">let a = 1;</w:t><w:br/><w:t xml:space="preserve">  let b = 2;</w:t>"#
        ));
    }

    #[test]
    fn table_header_is_bold_and_rows_fit_columns() {
        let xml = document("| A | B |\n|---|---|\n| 1 | 2 | 3 |\n| x |  |");
        assert!(xml.contains(r#"<w:tblStyle w:val="LightGridAccent1"/>"#));
        assert_eq!(xml.matches("<w:gridCol ").count(), 2);
        assert_eq!(xml.matches("<w:tr>").count(), 3);
        assert_eq!(xml.matches("<w:b/>").count(), 2);
        assert!(!xml.contains(">3<"));
        // Second data row: "x" then an empty cell
        assert!(xml.contains(
            r#"<w:t xml:space="preserve">x</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:tcW w:w="4680" w:type="dxa"/></w:tcPr><w:p></w:p></w:tc></w:tr>"#
        ));
    }

    #[test]
    fn styles_carry_configured_fonts() {
        let mut config = Config::default();
        config.font.body = "Arial".to_string();
        config.font.body_size = 12.0;
        let xml = styles_xml(&config);
        assert!(xml.contains(r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial""#));
        assert!(xml.contains(r#"<w:sz w:val="24"/>"#));
        assert!(xml.contains(r#"w:styleId="LightGridAccent1""#));
        assert!(xml.contains(r#"<w:name w:val="Intense Quote"/>"#));
    }

    #[test]
    fn default_styles_use_calibri_eleven() {
        let xml = styles_xml(&Config::default());
        assert!(xml.contains(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri""#));
        assert!(xml.contains(r#"<w:sz w:val="22"/><w:szCs w:val="22"/><w:lang"#));
    }

    #[test]
    fn archive_contains_all_parts() {
        let bytes = blocks_to_docx(&parse("# Hi"), &Config::default(), Some("Report")).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }

        let mut core = String::new();
        archive
            .by_name("docProps/core.xml")
            .unwrap()
            .read_to_string(&mut core)
            .unwrap();
        assert!(core.contains("<dc:title>Report</dc:title>"));
    }
}
