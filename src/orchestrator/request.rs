//! 请求结构与校验
//!
//! 校验全部在访问存储之前完成。

use crate::error::ValidationError;
use crate::models::SectionKey;
use crate::render::OutputFormat;
use crate::template::TemplateId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// 生成请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub person_id: Value,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub sections: Vec<String>,
}

/// 预览请求；未给出 sections 时预览全部分类
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default)]
    pub person_id: Value,
    #[serde(default)]
    pub sections: Option<Vec<String>>,
}

/// 校验通过的生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidGenerate {
    pub person_id: u64,
    pub template: TemplateId,
    pub format: OutputFormat,
    pub sections: BTreeSet<SectionKey>,
}

/// 校验通过的预览请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPreview {
    pub person_id: u64,
    pub sections: BTreeSet<SectionKey>,
}

impl GenerateRequest {
    pub fn new(person_id: u64, template: &str, format: &str, sections: &[&str]) -> Self {
        Self {
            person_id: Value::from(person_id),
            template: template.to_string(),
            format: format.to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<ValidGenerate, ValidationError> {
        let person_id = parse_person_id(&self.person_id)?;
        let template = TemplateId::parse(&self.template)
            .ok_or_else(|| ValidationError::UnknownTemplate(self.template.clone()))?;
        let format = OutputFormat::parse(&self.format)
            .ok_or_else(|| ValidationError::UnknownFormat(self.format.clone()))?;
        let sections = parse_sections(&self.sections)?;

        Ok(ValidGenerate {
            person_id,
            template,
            format,
            sections,
        })
    }
}

impl PreviewRequest {
    pub fn validate(&self) -> Result<ValidPreview, ValidationError> {
        let person_id = parse_person_id(&self.person_id)?;
        let sections = match &self.sections {
            Some(names) => parse_sections(names)?,
            None => SectionKey::CANONICAL_ORDER.iter().copied().collect(),
        };
        Ok(ValidPreview {
            person_id,
            sections,
        })
    }
}

/// 正整数，或只含数字的字符串
fn parse_person_id(value: &Value) -> Result<u64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<u64>().ok()
            } else {
                None
            }
        }
        _ => None,
    };

    parsed
        .filter(|&id| id > 0)
        .ok_or_else(|| ValidationError::InvalidPersonId(value.to_string()))
}

fn parse_sections(names: &[String]) -> Result<BTreeSet<SectionKey>, ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::EmptySections);
    }
    names
        .iter()
        .map(|name| {
            SectionKey::parse(name).ok_or_else(|| ValidationError::UnknownSection(name.clone()))
        })
        .collect()
}
