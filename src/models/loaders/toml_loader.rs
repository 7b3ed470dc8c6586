use crate::models::record::{CategoryRecord, PersonalRecord};
use crate::models::section::SectionKey;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 单人档案文件（`<目录>/<personId>.toml`）
///
/// 顶层 `[personal]` 表为个人信息，其余每个分类一个表数组，
/// 例如 `[[education]]`、`[[books]]`。
#[derive(Debug, Clone)]
pub struct PersonFile {
    pub path: PathBuf,
    table: toml::Table,
}

impl PersonFile {
    /// 解析文件内容
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let table: toml::Table = toml::from_str(content)
            .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;
        Ok(Self { path, table })
    }

    /// 个人信息；缺失时返回 None
    pub fn personal(&self) -> Result<Option<PersonalRecord>> {
        match self.table.get("personal") {
            Some(value) => {
                let record = value
                    .clone()
                    .try_into::<PersonalRecord>()
                    .with_context(|| format!("[personal] 格式错误: {}", self.path.display()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// 某分类的记录；文件中没有该分类时为空
    pub fn section(&self, key: SectionKey) -> Result<Vec<CategoryRecord>> {
        match self.table.get(key.as_str()) {
            Some(value) => value
                .clone()
                .try_into::<Vec<CategoryRecord>>()
                .with_context(|| format!("[[{}]] 格式错误: {}", key, self.path.display())),
            None => Ok(Vec::new()),
        }
    }
}

/// 从目录加载某人的档案文件；文件不存在返回 None
pub async fn load_person_file(folder: &Path, person_id: u64) -> Result<Option<PersonFile>> {
    let path = folder.join(format!("{}.toml", person_id));

    if !fs::try_exists(&path).await.unwrap_or(false) {
        tracing::debug!("档案文件不存在: {}", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", path.display()))?;

    PersonFile::parse(path, &content).map(Some)
}
