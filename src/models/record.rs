use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 个人信息（必需）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// 姓名
    pub name: String,
    /// 职称 / 职务
    #[serde(default)]
    pub designation: Option<String>,
    /// 所在院系
    #[serde(default)]
    pub department: Option<String>,
    /// 所在单位
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// 头像地址
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl PersonalRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            designation: None,
            department: None,
            institution: None,
            email: None,
            phone: None,
            address: None,
            profile_image: None,
        }
    }

    /// 单位信息行：院系, 单位
    pub fn affiliation_line(&self) -> Option<String> {
        join_present([self.department.as_deref(), self.institution.as_deref()], ", ")
    }

    /// 联系方式行：邮箱 · 电话 · 地址
    pub fn contact_line(&self) -> Option<String> {
        join_present(
            [
                self.email.as_deref(),
                self.phone.as_deref(),
                self.address.as_deref(),
            ],
            " · ",
        )
    }
}

/// 分类记录
///
/// 公共字段之外的分类专属字段放在 `details` 中，
/// `BTreeMap` 保证同一份数据总是以相同顺序输出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// 主标签（学位、论文题目、奖项名称等）
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    /// 机构 / 会议 / 期刊
    #[serde(default)]
    pub institution: Option<String>,
    /// 证明材料地址
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl CategoryRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: None,
            institution: None,
            document: None,
            details: BTreeMap::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// 副标题：机构 | 日期
    pub fn subtitle(&self) -> Option<String> {
        join_present([self.institution.as_deref(), self.date.as_deref()], " | ")
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}

fn join_present<const N: usize>(parts: [Option<&str>; N], sep: &str) -> Option<String> {
    let present: Vec<&str> = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(sep))
    }
}
