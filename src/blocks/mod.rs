//! 渲染无关的中间块
//!
//! 块只引用 `StyleSlot`，不携带具体样式值；两个渲染器消费同一份块序列。

pub mod builder;

pub use builder::build_blocks;

use crate::models::SectionKey;
use crate::template::StyleSlot;

/// 带样式槽位的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub slot: StyleSlot,
    pub value: String,
}

impl Text {
    /// 文本在此统一清洗，两个渲染器拿到的是同一份字符串
    pub fn new(slot: StyleSlot, value: impl AsRef<str>) -> Self {
        Self {
            slot,
            value: printable(value.as_ref()),
        }
    }
}

/// 去掉 XML 1.0 不允许出现的字符（C0 控制符、U+FFFE、U+FFFF）
pub fn printable(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            matches!(c,
                '\t' | '\n' | '\r'
                | '\u{20}'..='\u{D7FF}'
                | '\u{E000}'..='\u{FFFD}'
                | '\u{10000}'..='\u{10FFFF}')
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(HeaderBlock),
    Section(SectionBlock),
}

/// 页眉：姓名、职称、单位、联系方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub name: Text,
    pub subtitle: Option<Text>,
    pub affiliation: Option<Text>,
    pub contact: Option<Text>,
    /// 头像地址，仅固定版式渲染
    pub photo: Option<String>,
}

impl HeaderBlock {
    pub const BAND: StyleSlot = StyleSlot::HeaderBand;

    /// 姓名之后的各行，按显示顺序
    pub fn lines(&self) -> impl Iterator<Item = &Text> {
        self.subtitle
            .iter()
            .chain(self.affiliation.iter())
            .chain(self.contact.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    pub key: SectionKey,
    pub title: Text,
    /// 来自 section wrapper 槽位的分页提示
    pub keep_together: bool,
    pub body: SectionBody,
}

impl SectionBlock {
    pub const WRAPPER: StyleSlot = StyleSlot::SectionWrapper;

    pub fn is_empty(&self) -> bool {
        match &self.body {
            SectionBody::Items(items) => items.is_empty(),
            SectionBody::Table(table) => table.rows.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Items(Vec<ItemBlock>),
    Table(TableBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    /// ItemWrapper 或 PublicationEntry
    pub wrapper: StyleSlot,
    pub title: Text,
    pub subtitle: Option<Text>,
    pub details: Vec<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub headers: Vec<Text>,
    pub rows: Vec<Vec<Text>>,
}

impl TableBlock {
    pub const TABLE: StyleSlot = StyleSlot::Table;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_drops_characters_xml_cannot_carry() {
        let text = Text::new(StyleSlot::ItemTitle, "a\u{1}b\u{FFFE}c\u{FFFF}\td\u{1F600}");
        assert_eq!(text.value, "abc\td\u{1F600}");
    }

    #[test]
    fn test_printable_keeps_ordinary_text() {
        assert_eq!(printable("Rao & <Sons> - 2020"), "Rao & <Sons> - 2020");
    }
}
