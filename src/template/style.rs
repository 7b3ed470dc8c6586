//! 样式槽位与样式表
//!
//! 渲染器只通过 `StyleSlot` 取样式，不接触任何字符串键。
//! 样式表在构造时校验完整性，之后的查找不会失败。

use crate::error::RegistryError;
use crate::template::TemplateId;
use std::fmt;

/// 样式槽位：每个模板都必须定义的视觉角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleSlot {
    /// 文档正文
    Document,
    /// 页眉区域
    HeaderBand,
    /// 姓名
    Name,
    /// 职称 / 副标题
    Subtitle,
    /// 联系方式
    ContactLine,
    /// 分类外框
    SectionWrapper,
    /// 分类标题
    SectionTitle,
    /// 条目外框
    ItemWrapper,
    /// 条目标题
    ItemTitle,
    /// 条目副标题
    ItemSubtitle,
    /// 条目明细行
    ItemDetail,
    /// 表格
    Table,
    /// 表头单元格
    TableHeaderCell,
    /// 表格数据单元格
    TableCell,
    /// 出版物条目
    PublicationEntry,
}

impl StyleSlot {
    pub const ALL: [StyleSlot; 15] = [
        StyleSlot::Document,
        StyleSlot::HeaderBand,
        StyleSlot::Name,
        StyleSlot::Subtitle,
        StyleSlot::ContactLine,
        StyleSlot::SectionWrapper,
        StyleSlot::SectionTitle,
        StyleSlot::ItemWrapper,
        StyleSlot::ItemTitle,
        StyleSlot::ItemSubtitle,
        StyleSlot::ItemDetail,
        StyleSlot::Table,
        StyleSlot::TableHeaderCell,
        StyleSlot::TableCell,
        StyleSlot::PublicationEntry,
    ];

    pub const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }

    /// HTML class 名
    pub fn css_class(self) -> &'static str {
        match self {
            StyleSlot::Document => "cv-document",
            StyleSlot::HeaderBand => "cv-header",
            StyleSlot::Name => "cv-name",
            StyleSlot::Subtitle => "cv-subtitle",
            StyleSlot::ContactLine => "cv-contact",
            StyleSlot::SectionWrapper => "cv-section",
            StyleSlot::SectionTitle => "cv-section-title",
            StyleSlot::ItemWrapper => "cv-item",
            StyleSlot::ItemTitle => "cv-item-title",
            StyleSlot::ItemSubtitle => "cv-item-subtitle",
            StyleSlot::ItemDetail => "cv-item-detail",
            StyleSlot::Table => "cv-table",
            StyleSlot::TableHeaderCell => "cv-th",
            StyleSlot::TableCell => "cv-td",
            StyleSlot::PublicationEntry => "cv-publication",
        }
    }

    /// Word 段落样式 ID
    pub fn word_style_id(self) -> &'static str {
        match self {
            StyleSlot::Document => "CvDocument",
            StyleSlot::HeaderBand => "CvHeaderBand",
            StyleSlot::Name => "CvName",
            StyleSlot::Subtitle => "CvSubtitle",
            StyleSlot::ContactLine => "CvContactLine",
            StyleSlot::SectionWrapper => "CvSectionWrapper",
            StyleSlot::SectionTitle => "CvSectionTitle",
            StyleSlot::ItemWrapper => "CvItemWrapper",
            StyleSlot::ItemTitle => "CvItemTitle",
            StyleSlot::ItemSubtitle => "CvItemSubtitle",
            StyleSlot::ItemDetail => "CvItemDetail",
            StyleSlot::Table => "CvTable",
            StyleSlot::TableHeaderCell => "CvTableHeaderCell",
            StyleSlot::TableCell => "CvTableCell",
            StyleSlot::PublicationEntry => "CvPublicationEntry",
        }
    }
}

impl fmt::Display for StyleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word_style_id())
    }
}

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);

    /// 六位十六进制，不含 `#`
    pub fn hex(self) -> String {
        format!("{:06X}", self.0 & 0xFF_FFFF)
    }

    pub fn css(self) -> String {
        format!("#{}", self.hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 边框处理
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Border {
    None,
    Bottom { width_pt: f32, color: Color },
    Left { width_pt: f32, color: Color },
    All { width_pt: f32, color: Color },
}

/// 分页提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBreak {
    Auto,
    /// 尽量不在内部断页
    AvoidInside,
}

/// 单个槽位的样式属性
#[derive(Debug, Clone, PartialEq)]
pub struct SlotStyle {
    pub font_family: &'static str,
    pub font_size_pt: f32,
    pub weight: FontWeight,
    pub italic: bool,
    pub uppercase: bool,
    pub color: Color,
    pub background: Option<Color>,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    pub align: Align,
    pub border: Border,
    pub page_break: PageBreak,
}

impl SlotStyle {
    pub fn text(font_family: &'static str, font_size_pt: f32, color: Color) -> Self {
        Self {
            font_family,
            font_size_pt,
            weight: FontWeight::Normal,
            italic: false,
            uppercase: false,
            color,
            background: None,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            align: Align::Left,
            border: Border::None,
            page_break: PageBreak::Auto,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn spacing(mut self, before_pt: f32, after_pt: f32) -> Self {
        self.space_before_pt = before_pt;
        self.space_after_pt = after_pt;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn avoid_break_inside(mut self) -> Self {
        self.page_break = PageBreak::AvoidInside;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

/// 单个模板的完整样式表
#[derive(Debug, Clone)]
pub struct StyleSheet {
    template: TemplateId,
    // 长度恒为 StyleSlot::COUNT，按槽位下标存放
    slots: Vec<SlotStyle>,
}

impl StyleSheet {
    /// 从 (槽位, 样式) 列表构造；缺失或重复的槽位都是构造错误
    pub fn from_entries(
        template: TemplateId,
        entries: Vec<(StyleSlot, SlotStyle)>,
    ) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<SlotStyle>> = vec![None; StyleSlot::COUNT];

        for (slot, style) in entries {
            let cell = &mut slots[slot.index()];
            if cell.is_some() {
                return Err(RegistryError::DuplicateSlot { template, slot });
            }
            *cell = Some(style);
        }

        let missing: Vec<StyleSlot> = StyleSlot::ALL
            .iter()
            .copied()
            .filter(|slot| slots[slot.index()].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::MissingSlots { template, missing });
        }

        Ok(Self {
            template,
            slots: slots.into_iter().flatten().collect(),
        })
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn get(&self, slot: StyleSlot) -> &SlotStyle {
        &self.slots[slot.index()]
    }
}
