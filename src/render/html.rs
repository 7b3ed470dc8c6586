//! 固定版式标记生成
//!
//! 块序列 → 带样式类的 HTML。每个样式槽位对应一个 CSS 类，
//! 样式值全部来自样式表，分页提示转换为 `break-inside: avoid`。

use crate::blocks::{Block, HeaderBlock, ItemBlock, SectionBlock, SectionBody, TableBlock, Text};
use crate::template::{Align, Border, FontWeight, SlotStyle, StyleSheet, StyleSlot};
use std::fmt::Write;

const PAGE_CSS: &str = "@page { size: A4; margin: 16mm 14mm; }\n\
* { box-sizing: border-box; }\n\
p, h1, h2 { margin: 0; }\n\
.cv-photo { float: right; width: 84px; height: 84px; object-fit: cover; border-radius: 4px; }\n\
.keep-together { break-inside: avoid; page-break-inside: avoid; }\n\
.cv-section-title { break-after: avoid; page-break-after: avoid; }\n\
.cv-table { width: 100%; border-collapse: collapse; }\n\
.cv-table tr { break-inside: avoid; page-break-inside: avoid; }\n\
.cv-th, .cv-td { padding: 3pt 5pt; text-align: left; vertical-align: top; }\n";

/// 生成完整 HTML 文档
pub fn to_markup(blocks: &[Block], sheet: &StyleSheet) -> String {
    let title = blocks
        .iter()
        .find_map(|b| match b {
            Block::Header(h) => Some(h.name.value.as_str()),
            Block::Section(_) => None,
        })
        .unwrap_or("Curriculum Vitae");

    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>CV - {}</title>", escape_html(title));
    out.push_str("<style>\n");
    out.push_str(PAGE_CSS);
    out.push_str(&stylesheet_css(sheet));
    out.push_str("</style>\n</head>\n");
    let _ = writeln!(out, "<body class=\"{}\">", StyleSlot::Document.css_class());

    for block in blocks {
        match block {
            Block::Header(header) => write_header(&mut out, header),
            Block::Section(section) => write_section(&mut out, section),
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// 每个槽位一条 CSS 规则
fn stylesheet_css(sheet: &StyleSheet) -> String {
    let mut css = String::new();
    for slot in StyleSlot::ALL {
        let style = sheet.get(slot);
        let _ = writeln!(css, ".{} {{ {} }}", slot.css_class(), slot_css(slot, style));
    }
    css
}

fn slot_css(slot: StyleSlot, style: &SlotStyle) -> String {
    let mut props = vec![
        format!("font-family: '{}', serif", style.font_family),
        format!("font-size: {}pt", style.font_size_pt),
        format!(
            "font-weight: {}",
            match style.weight {
                FontWeight::Normal => "normal",
                FontWeight::Bold => "bold",
            }
        ),
        format!("font-style: {}", if style.italic { "italic" } else { "normal" }),
        format!("color: {}", style.color.css()),
        format!(
            "text-align: {}",
            match style.align {
                Align::Left => "left",
                Align::Center => "center",
            }
        ),
        format!(
            "margin: {}pt 0 {}pt 0",
            style.space_before_pt, style.space_after_pt
        ),
    ];

    if style.uppercase {
        props.push("text-transform: uppercase".to_string());
    }
    if let Some(background) = style.background {
        props.push(format!("background-color: {}", background.css()));
        props.push("-webkit-print-color-adjust: exact; print-color-adjust: exact".to_string());
        if slot == StyleSlot::HeaderBand {
            props.push("padding: 14pt 16pt".to_string());
        }
    }

    // 表格边框画在单元格上，由下面的规则处理
    if slot != StyleSlot::Table {
        match style.border {
            Border::None => {}
            Border::Bottom { width_pt, color } => {
                props.push(format!("border-bottom: {}pt solid {}", width_pt, color.css()));
                props.push("padding-bottom: 3pt".to_string());
            }
            Border::Left { width_pt, color } => {
                props.push(format!("border-left: {}pt solid {}", width_pt, color.css()));
                props.push("padding-left: 6pt".to_string());
            }
            Border::All { width_pt, color } => {
                props.push(format!("border: {}pt solid {}", width_pt, color.css()));
                props.push("padding: 4pt".to_string());
            }
        }
    }

    let mut rule = props.join("; ");
    if slot == StyleSlot::Table {
        let cell_border = match style.border {
            Border::None => None,
            Border::Bottom { width_pt, color } => {
                Some(format!("border-bottom: {}pt solid {}", width_pt, color.css()))
            }
            Border::Left { width_pt, color } => {
                Some(format!("border-left: {}pt solid {}", width_pt, color.css()))
            }
            Border::All { width_pt, color } => {
                Some(format!("border: {}pt solid {}", width_pt, color.css()))
            }
        };
        if let Some(cell_border) = cell_border {
            let _ = write!(rule, " }}\n.cv-table th, .cv-table td {{ {}", cell_border);
        }
    }
    rule
}

fn write_header(out: &mut String, header: &HeaderBlock) {
    let _ = writeln!(out, "<header class=\"{}\">", HeaderBlock::BAND.css_class());
    if let Some(photo) = &header.photo {
        let _ = writeln!(
            out,
            "<img class=\"cv-photo\" src=\"{}\" alt=\"\">",
            escape_html(photo)
        );
    }
    write_text(out, "h1", &header.name);
    for line in header.lines() {
        write_text(out, "p", line);
    }
    out.push_str("</header>\n");
}

fn write_section(out: &mut String, section: &SectionBlock) {
    let mut class = SectionBlock::WRAPPER.css_class().to_string();
    if section.keep_together {
        class.push_str(" keep-together");
    }
    let _ = writeln!(
        out,
        "<section class=\"{}\" data-section=\"{}\">",
        class,
        section.key.as_str()
    );
    write_text(out, "h2", &section.title);

    match &section.body {
        SectionBody::Items(items) => {
            for item in items {
                write_item(out, item);
            }
        }
        SectionBody::Table(table) if !section.is_empty() => write_table(out, table),
        SectionBody::Table(_) => {}
    }

    out.push_str("</section>\n");
}

fn write_item(out: &mut String, item: &ItemBlock) {
    let _ = writeln!(out, "<div class=\"{}\">", item.wrapper.css_class());
    write_text(out, "p", &item.title);
    if let Some(subtitle) = &item.subtitle {
        write_text(out, "p", subtitle);
    }
    for detail in &item.details {
        write_text(out, "p", detail);
    }
    out.push_str("</div>\n");
}

fn write_table(out: &mut String, table: &TableBlock) {
    let _ = writeln!(out, "<table class=\"{}\">", TableBlock::TABLE.css_class());
    out.push_str("<thead><tr>");
    for header in &table.headers {
        write_inline(out, "th", header);
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            write_inline(out, "td", cell);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn write_text(out: &mut String, tag: &str, text: &Text) {
    write_inline(out, tag, text);
    out.push('\n');
}

fn write_inline(out: &mut String, tag: &str, text: &Text) {
    let _ = write!(
        out,
        "<{tag} class=\"{}\">{}</{tag}>",
        text.slot.css_class(),
        escape_html(&text.value),
    );
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
