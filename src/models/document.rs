use crate::models::record::{CategoryRecord, PersonalRecord};
use crate::models::section::SectionKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// 单次请求内聚合出的文档模型
///
/// 不持久化、不跨请求共享。`sections` 以 `SectionKey` 为键，
/// 迭代顺序即规范顺序，与抓取完成的先后无关。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    pub personal: Option<PersonalRecord>,
    pub sections: BTreeMap<SectionKey, Vec<CategoryRecord>>,
}

impl DocumentModel {
    pub fn new(personal: PersonalRecord) -> Self {
        Self {
            personal: Some(personal),
            sections: BTreeMap::new(),
        }
    }

    /// 取某分类的记录；未抓取的分类视为空
    pub fn records(&self, key: SectionKey) -> &[CategoryRecord] {
        self.sections.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, key: SectionKey, records: Vec<CategoryRecord>) {
        self.sections.insert(key, records);
    }

    pub fn person_name(&self) -> Option<&str> {
        self.personal.as_ref().map(|p| p.name.as_str())
    }
}
