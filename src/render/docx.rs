//! 可编辑文档渲染器（WordprocessingML / .docx）
//!
//! 每个样式槽位生成一个段落样式写入 `styles.xml`，正文段落通过 `pStyle` 引用；
//! 条目与分类外框的间距、边框以段落直接格式叠加，表格块生成原生表格。
//!
//! 分页：`keep_together` 的分类中，除最后一段外每段带 `keepNext` + `keepLines`，
//! 表格行一律 `cantSplit`。

use crate::blocks::{Block, HeaderBlock, ItemBlock, SectionBlock, SectionBody, TableBlock, Text};
use crate::error::RenderError;
use crate::render::{OutputFormat, Renderer};
use crate::template::{Align, Border, SlotStyle, StyleSheet, StyleSlot};
use async_trait::async_trait;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// A4，页边距 16mm / 14mm（twips）
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="907" w:right="794" w:bottom="907" w:left="794" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#;

/// 版心宽度（twips）
const TEXT_WIDTH: u32 = 11906 - 2 * 794;

/// docx 文件内的部件路径
pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";

#[derive(Debug, Default)]
pub struct WordRenderer;

impl WordRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Renderer for WordRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Word
    }

    async fn render(&self, blocks: &[Block], sheet: &StyleSheet) -> Result<Vec<u8>, RenderError> {
        let document = document_xml(blocks, sheet);
        let styles = styles_xml(sheet);
        let bytes = package(&document, &styles)?;
        debug!("DOCX 打包完成: {} 字节", bytes.len());
        Ok(bytes)
    }
}

fn package(document: &str, styles: &str) -> Result<Vec<u8>, RenderError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        (STYLES_PART, styles),
        (DOCUMENT_PART, document),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

// ========== styles.xml ==========

fn styles_xml(sheet: &StyleSheet) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(out, "\n<w:styles xmlns:w=\"{}\">", W_NS);

    let body = sheet.get(StyleSlot::Document);
    let _ = write!(
        out,
        "<w:docDefaults><w:rPrDefault>{}</w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:before=\"0\" w:after=\"0\"/></w:pPr></w:pPrDefault></w:docDefaults>",
        run_properties(body)
    );
    out.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#);

    for slot in StyleSlot::ALL {
        let style = sheet.get(slot);
        let _ = write!(
            out,
            "<w:style w:type=\"paragraph\" w:customStyle=\"1\" w:styleId=\"{id}\"><w:name w:val=\"{id}\"/><w:basedOn w:val=\"Normal\"/><w:qFormat/>{}{}</w:style>",
            style_paragraph_properties(slot, style),
            run_properties(style),
            id = slot.word_style_id(),
        );
    }

    out.push_str("</w:styles>");
    out
}

/// 样式级段落属性；外框类槽位的边框由正文直接格式处理
fn style_paragraph_properties(slot: StyleSlot, style: &SlotStyle) -> String {
    let mut ppr = String::from("<w:pPr>");
    let text_bearing = !matches!(
        slot,
        StyleSlot::Document
            | StyleSlot::HeaderBand
            | StyleSlot::SectionWrapper
            | StyleSlot::ItemWrapper
            | StyleSlot::PublicationEntry
            | StyleSlot::Table
    );
    if text_bearing {
        ppr.push_str(&paragraph_border(style.border));
    }
    let _ = write!(
        ppr,
        "<w:spacing w:before=\"{}\" w:after=\"{}\"/>",
        twips(style.space_before_pt),
        twips(style.space_after_pt)
    );
    if style.align == Align::Center {
        ppr.push_str("<w:jc w:val=\"center\"/>");
    }
    ppr.push_str("</w:pPr>");
    ppr
}

fn run_properties(style: &SlotStyle) -> String {
    let mut rpr = String::from("<w:rPr>");
    let font = escape_xml(style.font_family);
    let _ = write!(
        rpr,
        "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>"
    );
    if style.is_bold() {
        rpr.push_str("<w:b/>");
    }
    if style.italic {
        rpr.push_str("<w:i/>");
    }
    if style.uppercase {
        rpr.push_str("<w:caps/>");
    }
    let half_points = (style.font_size_pt * 2.0).round() as u32;
    let _ = write!(
        rpr,
        "<w:color w:val=\"{}\"/><w:sz w:val=\"{half_points}\"/><w:szCs w:val=\"{half_points}\"/>",
        style.color.hex()
    );
    rpr.push_str("</w:rPr>");
    rpr
}

fn paragraph_border(border: Border) -> String {
    match border {
        Border::None => String::new(),
        Border::Bottom { width_pt, color } => {
            format!("<w:pBdr>{}</w:pBdr>", border_edge("bottom", width_pt, &color.hex()))
        }
        Border::Left { width_pt, color } => {
            format!("<w:pBdr>{}</w:pBdr>", border_edge("left", width_pt, &color.hex()))
        }
        Border::All { width_pt, color } => {
            let hex = color.hex();
            format!(
                "<w:pBdr>{}{}{}{}</w:pBdr>",
                border_edge("top", width_pt, &hex),
                border_edge("left", width_pt, &hex),
                border_edge("bottom", width_pt, &hex),
                border_edge("right", width_pt, &hex)
            )
        }
    }
}

fn table_borders(border: Border) -> String {
    let (edges, width_pt, color) = match border {
        Border::None => return String::new(),
        Border::Bottom { width_pt, color } => (&["bottom", "insideH"][..], width_pt, color),
        Border::Left { width_pt, color } => (&["left"][..], width_pt, color),
        Border::All { width_pt, color } => (
            &["top", "left", "bottom", "right", "insideH", "insideV"][..],
            width_pt,
            color,
        ),
    };
    let hex = color.hex();
    let inner: String = edges
        .iter()
        .map(|edge| border_edge(edge, width_pt, &hex))
        .collect();
    format!("<w:tblBorders>{}</w:tblBorders>", inner)
}

fn border_edge(edge: &str, width_pt: f32, hex: &str) -> String {
    // 边框宽度单位为 1/8 磅
    let eighths = ((width_pt * 8.0).round() as u32).clamp(2, 96);
    format!("<w:{edge} w:val=\"single\" w:sz=\"{eighths}\" w:space=\"4\" w:color=\"{hex}\"/>")
}

fn twips(pt: f32) -> u32 {
    (pt.max(0.0) * 20.0).round() as u32
}

// ========== document.xml ==========

/// 正文段落上叠加的直接格式
#[derive(Default, Clone, Copy)]
struct Direct {
    keep_next: bool,
    space_before: Option<f32>,
    space_after: Option<f32>,
    border: Option<Border>,
}

struct Para<'a> {
    text: &'a Text,
    direct: Direct,
}

fn document_xml(blocks: &[Block], sheet: &StyleSheet) -> String {
    let mut out = String::with_capacity(32 * 1024);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(out, "\n<w:document xmlns:w=\"{}\"><w:body>", W_NS);

    for block in blocks {
        match block {
            Block::Header(header) => write_header(&mut out, header, sheet),
            Block::Section(section) => write_section(&mut out, section, sheet),
        }
    }

    // 正文以段落结尾，避免表格紧贴分节符
    out.push_str("<w:p/>");
    out.push_str(SECTION_PROPERTIES);
    out.push_str("</w:body></w:document>");
    out
}

/// 页眉区域：单格表格承载底色与边框
fn write_header(out: &mut String, header: &HeaderBlock, sheet: &StyleSheet) {
    let band = sheet.get(HeaderBlock::BAND);
    let _ = write!(
        out,
        "<w:tbl><w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/>{}<w:tblCellMar><w:top w:w=\"160\" w:type=\"dxa\"/><w:left w:w=\"200\" w:type=\"dxa\"/><w:bottom w:w=\"160\" w:type=\"dxa\"/><w:right w:w=\"200\" w:type=\"dxa\"/></w:tblCellMar></w:tblPr><w:tblGrid><w:gridCol w:w=\"{TEXT_WIDTH}\"/></w:tblGrid>",
        table_borders(band.border)
    );
    out.push_str("<w:tr><w:trPr><w:cantSplit/></w:trPr><w:tc><w:tcPr>");
    let _ = write!(out, "<w:tcW w:w=\"{TEXT_WIDTH}\" w:type=\"dxa\"/>");
    if let Some(background) = band.background {
        out.push_str(&cell_shading(&background.hex()));
    }
    out.push_str("</w:tcPr>");

    write_paragraph(out, &header.name, Direct::default());
    for line in header.lines() {
        write_paragraph(out, line, Direct::default());
    }
    out.push_str("</w:tc></w:tr></w:tbl>");

    // 页眉之后的间距
    let _ = write!(
        out,
        "<w:p><w:pPr><w:spacing w:before=\"0\" w:after=\"{}\"/></w:pPr></w:p>",
        twips(band.space_after_pt)
    );
}

fn write_section(out: &mut String, section: &SectionBlock, sheet: &StyleSheet) {
    let wrapper = sheet.get(SectionBlock::WRAPPER);
    let title_style = sheet.get(section.title.slot);

    let mut paras = vec![Para {
        text: &section.title,
        direct: Direct {
            // 标题不与下文分离
            keep_next: true,
            space_before: Some(wrapper.space_before_pt + title_style.space_before_pt),
            ..Direct::default()
        },
    }];

    let table = match &section.body {
        SectionBody::Items(items) => {
            for item in items {
                push_item(&mut paras, item, sheet);
            }
            None
        }
        SectionBody::Table(table) if !section.is_empty() => Some(table),
        SectionBody::Table(_) => None,
    };

    let last = paras.len() - 1;
    for (i, para) in paras.iter_mut().enumerate() {
        let trailing = i == last && table.is_none();
        if section.keep_together && !trailing {
            para.direct.keep_next = true;
        }
    }
    for para in &paras {
        write_paragraph(out, para.text, para.direct);
    }

    if let Some(table) = table {
        write_table(out, table, sheet, section.keep_together);
    }
}

fn push_item<'a>(paras: &mut Vec<Para<'a>>, item: &'a ItemBlock, sheet: &StyleSheet) {
    let wrapper = sheet.get(item.wrapper);
    let border = match wrapper.border {
        Border::None => None,
        other => Some(other),
    };

    let texts: Vec<&Text> = std::iter::once(&item.title)
        .chain(item.subtitle.iter())
        .chain(item.details.iter())
        .collect();
    let last = texts.len() - 1;

    for (i, text) in texts.into_iter().enumerate() {
        let style = sheet.get(text.slot);
        paras.push(Para {
            text,
            direct: Direct {
                keep_next: false,
                space_before: (i == 0).then_some(wrapper.space_before_pt + style.space_before_pt),
                space_after: (i == last).then_some(wrapper.space_after_pt + style.space_after_pt),
                border,
            },
        });
    }
}

fn write_table(out: &mut String, table: &TableBlock, sheet: &StyleSheet, keep_together: bool) {
    let style = sheet.get(TableBlock::TABLE);
    let columns = table.headers.len().max(1) as u32;
    let col_width = TEXT_WIDTH / columns;

    // 表格前后间距用空段落表示
    let _ = write!(
        out,
        "<w:p><w:pPr><w:keepNext/><w:spacing w:before=\"{}\" w:after=\"0\"/></w:pPr></w:p>",
        twips(style.space_before_pt)
    );

    let _ = write!(
        out,
        "<w:tbl><w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/>{}<w:tblCellMar><w:left w:w=\"100\" w:type=\"dxa\"/><w:right w:w=\"100\" w:type=\"dxa\"/></w:tblCellMar></w:tblPr><w:tblGrid>",
        table_borders(style.border)
    );
    for _ in 0..columns {
        let _ = write!(out, "<w:gridCol w:w=\"{col_width}\"/>");
    }
    out.push_str("</w:tblGrid>");

    let keep = |row_is_last: bool| Direct {
        keep_next: keep_together && !row_is_last,
        ..Direct::default()
    };

    write_row(out, &table.headers, sheet, col_width, true, keep(false));
    let last = table.rows.len().saturating_sub(1);
    for (i, row) in table.rows.iter().enumerate() {
        write_row(out, row, sheet, col_width, false, keep(i == last));
    }
    out.push_str("</w:tbl>");

    let _ = write!(
        out,
        "<w:p><w:pPr><w:spacing w:before=\"0\" w:after=\"{}\"/></w:pPr></w:p>",
        twips(style.space_after_pt)
    );
}

fn write_row(
    out: &mut String,
    cells: &[Text],
    sheet: &StyleSheet,
    col_width: u32,
    is_header: bool,
    direct: Direct,
) {
    out.push_str("<w:tr><w:trPr><w:cantSplit/>");
    if is_header {
        out.push_str("<w:tblHeader/>");
    }
    out.push_str("</w:trPr>");
    for cell in cells {
        let _ = write!(out, "<w:tc><w:tcPr><w:tcW w:w=\"{col_width}\" w:type=\"dxa\"/>");
        if let Some(background) = sheet.get(cell.slot).background {
            out.push_str(&cell_shading(&background.hex()));
        }
        out.push_str("</w:tcPr>");
        write_paragraph(out, cell, direct);
        out.push_str("</w:tc>");
    }
    out.push_str("</w:tr>");
}

fn cell_shading(hex: &str) -> String {
    format!("<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{hex}\"/>")
}

fn write_paragraph(out: &mut String, text: &Text, direct: Direct) {
    let _ = write!(
        out,
        "<w:p><w:pPr><w:pStyle w:val=\"{}\"/>",
        text.slot.word_style_id()
    );
    if direct.keep_next {
        out.push_str("<w:keepNext/><w:keepLines/>");
    }
    if let Some(border) = direct.border {
        out.push_str(&paragraph_border(border));
    }
    if direct.space_before.is_some() || direct.space_after.is_some() {
        out.push_str("<w:spacing");
        if let Some(before) = direct.space_before {
            let _ = write!(out, " w:before=\"{}\"", twips(before));
        }
        if let Some(after) = direct.space_after {
            let _ = write!(out, " w:after=\"{}\"", twips(after));
        }
        out.push_str("/>");
    }
    let _ = write!(
        out,
        "</w:pPr><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(&text.value)
    );
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
