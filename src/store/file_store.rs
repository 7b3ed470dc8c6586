//! 本地 TOML 目录存储
//!
//! 每人一个 `<personId>.toml` 文件，每次抓取重新读取，文件修改后立即生效。

use crate::models::{load_person_file, CategoryRecord, PersonalRecord, SectionKey};
use crate::store::{RecordStore, StoreConnector};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub struct FileRecordStore {
    folder: PathBuf,
}

impl FileRecordStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn fetch_personal(&self, person_id: u64) -> Result<Option<PersonalRecord>> {
        match load_person_file(&self.folder, person_id).await? {
            Some(file) => file.personal(),
            None => Ok(None),
        }
    }

    async fn fetch_section(&self, person_id: u64, key: SectionKey) -> Result<Vec<CategoryRecord>> {
        match load_person_file(&self.folder, person_id).await? {
            Some(file) => file.section(key),
            None => Ok(Vec::new()),
        }
    }

    async fn is_healthy(&self) -> bool {
        tokio::fs::metadata(&self.folder)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

/// 目录存储的连接器：目录不存在视为连接失败
pub struct FileConnector {
    folder: PathBuf,
}

impl FileConnector {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

#[async_trait]
impl StoreConnector for FileConnector {
    async fn connect(&self) -> Result<Arc<dyn RecordStore>> {
        let metadata = tokio::fs::metadata(&self.folder)
            .await
            .with_context(|| format!("文件夹不存在: {}", self.folder.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("不是文件夹: {}", self.folder.display());
        }
        Ok(Arc::new(FileRecordStore::new(self.folder.clone())))
    }

    fn describe(&self) -> String {
        format!("toml://{}", self.folder.display())
    }
}
