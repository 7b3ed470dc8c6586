//! 模板样式注册表
//!
//! 启动时一次性构造并校验全部模板，之后只读共享。

pub mod presets;
pub mod style;

pub use style::{Align, Border, Color, FontWeight, PageBreak, SlotStyle, StyleSheet, StyleSlot};

use crate::error::RegistryError;
use std::fmt;
use tracing::debug;

/// 模板标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Classic,
    Modern,
    Minimal,
    Academic,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Minimal,
        TemplateId::Academic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::Academic => "academic",
        }
    }

    /// 精确匹配（忽略大小写与首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 样式注册表
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    sheets: Vec<StyleSheet>,
}

impl StyleRegistry {
    /// 构造内置注册表；任何模板缺槽位都在这里失败
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_provider(presets::entries)
    }

    /// 用自定义的模板来源构造
    pub fn from_provider<F>(provider: F) -> Result<Self, RegistryError>
    where
        F: Fn(TemplateId) -> Vec<(StyleSlot, SlotStyle)>,
    {
        let sheets = TemplateId::ALL
            .iter()
            .map(|&template| StyleSheet::from_entries(template, provider(template)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("样式注册表已就绪: {} 套模板", sheets.len());
        Ok(Self { sheets })
    }

    pub fn sheet(&self, template: TemplateId) -> &StyleSheet {
        &self.sheets[template.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_defines_every_slot() {
        let registry = StyleRegistry::new().unwrap();
        for template in TemplateId::ALL {
            let sheet = registry.sheet(template);
            assert_eq!(sheet.template(), template);
            for slot in StyleSlot::ALL {
                assert!(sheet.get(slot).font_size_pt > 0.0, "{} / {}", template, slot);
            }
        }
    }

    #[test]
    fn test_builtin_presets_have_exact_slot_count() {
        for template in TemplateId::ALL {
            assert_eq!(presets::entries(template).len(), StyleSlot::COUNT);
        }
    }

    #[test]
    fn test_partial_template_fails_registry_construction() {
        let result = StyleRegistry::from_provider(|template| {
            let mut entries = presets::entries(template);
            if template == TemplateId::Academic {
                entries.retain(|(slot, _)| *slot != StyleSlot::PublicationEntry);
            }
            entries
        });
        assert!(matches!(
            result,
            Err(RegistryError::MissingSlots { template: TemplateId::Academic, .. })
        ));
    }

    #[test]
    fn test_template_parse() {
        assert_eq!(TemplateId::parse("modern"), Some(TemplateId::Modern));
        assert_eq!(TemplateId::parse(" Classic "), Some(TemplateId::Classic));
        assert_eq!(TemplateId::parse("futuristic"), None);
    }

    #[test]
    fn test_section_wrapper_hints_differ_between_templates() {
        let registry = StyleRegistry::new().unwrap();
        assert_eq!(
            registry.sheet(TemplateId::Classic).get(StyleSlot::SectionWrapper).page_break,
            PageBreak::AvoidInside
        );
        assert_eq!(
            registry.sheet(TemplateId::Minimal).get(StyleSlot::SectionWrapper).page_break,
            PageBreak::Auto
        );
    }
}
