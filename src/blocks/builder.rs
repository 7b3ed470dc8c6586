//! 块构建器
//!
//! 先输出一个页眉块，再按规范顺序（与请求顺序无关）为每个请求的分类输出一个分类块。
//! 没有记录的分类仍然输出（只有标题）。

use crate::blocks::{printable, Block, HeaderBlock, ItemBlock, SectionBlock, SectionBody, TableBlock, Text};
use crate::error::MissingPersonal;
use crate::models::{CategoryRecord, ColumnSource, DocumentModel, PersonalRecord, SectionKey, SectionLayout};
use crate::template::{PageBreak, StyleSheet, StyleSlot};

/// 表格中缺失值的占位
pub const EMPTY_CELL: &str = "-";

pub fn build_blocks(
    model: &DocumentModel,
    requested: &[SectionKey],
    sheet: &StyleSheet,
) -> Result<Vec<Block>, MissingPersonal> {
    let personal = model.personal.as_ref().ok_or(MissingPersonal)?;
    let keep_together = sheet.get(StyleSlot::SectionWrapper).page_break == PageBreak::AvoidInside;

    let mut blocks = vec![Block::Header(header_block(personal))];

    blocks.extend(
        SectionKey::CANONICAL_ORDER
            .iter()
            .copied()
            .filter(|key| requested.contains(key))
            .map(|key| Block::Section(section_block(key, model.records(key), keep_together))),
    );

    Ok(blocks)
}

fn header_block(personal: &PersonalRecord) -> HeaderBlock {
    HeaderBlock {
        name: Text::new(StyleSlot::Name, personal.name.trim()),
        subtitle: personal
            .designation
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Text::new(StyleSlot::Subtitle, s)),
        affiliation: personal
            .affiliation_line()
            .map(|s| Text::new(StyleSlot::Subtitle, s)),
        contact: personal
            .contact_line()
            .map(|s| Text::new(StyleSlot::ContactLine, s)),
        photo: personal.profile_image.as_deref().map(printable),
    }
}

fn section_block(key: SectionKey, records: &[CategoryRecord], keep_together: bool) -> SectionBlock {
    let body = match key.layout() {
        SectionLayout::Items => {
            let wrapper = if key.is_publication() {
                StyleSlot::PublicationEntry
            } else {
                StyleSlot::ItemWrapper
            };
            SectionBody::Items(records.iter().map(|r| item_block(r, wrapper)).collect())
        }
        SectionLayout::Table(columns) => SectionBody::Table(TableBlock {
            headers: columns
                .iter()
                .map(|c| Text::new(StyleSlot::TableHeaderCell, c.header))
                .collect(),
            rows: records
                .iter()
                .map(|record| {
                    columns
                        .iter()
                        .map(|c| Text::new(StyleSlot::TableCell, cell_value(record, c.source)))
                        .collect()
                })
                .collect(),
        }),
    };

    SectionBlock {
        key,
        title: Text::new(StyleSlot::SectionTitle, key.title()),
        keep_together,
        body,
    }
}

fn item_block(record: &CategoryRecord, wrapper: StyleSlot) -> ItemBlock {
    let mut details: Vec<Text> = record
        .details
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| Text::new(StyleSlot::ItemDetail, format!("{}: {}", label(k), v.trim())))
        .collect();

    if let Some(document) = record.document.as_deref().filter(|d| !d.trim().is_empty()) {
        details.push(Text::new(
            StyleSlot::ItemDetail,
            format!("Supporting document: {}", document.trim()),
        ));
    }

    ItemBlock {
        wrapper,
        title: Text::new(StyleSlot::ItemTitle, record.title.trim()),
        subtitle: record.subtitle().map(|s| Text::new(StyleSlot::ItemSubtitle, s)),
        details,
    }
}

fn cell_value(record: &CategoryRecord, source: ColumnSource) -> String {
    let value = match source {
        ColumnSource::Title => Some(record.title.as_str()),
        ColumnSource::Institution => record.institution.as_deref(),
        ColumnSource::Date => record.date.as_deref(),
        ColumnSource::Detail(name) => record.detail(name),
    };
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_CELL)
        .to_string()
}

/// `funding_agency` → `Funding agency`
fn label(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
