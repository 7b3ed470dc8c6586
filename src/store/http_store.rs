/// HTTP 记录存储客户端
///
/// 接口约定：
/// - `GET {base}/persons/{id}/personal` → 200 记录 / 404 无个人信息
/// - `GET {base}/persons/{id}/sections/{key}` → 200 JSON 数组
/// - `GET {base}/health` → 2xx 表示可用
use crate::config::Config;
use crate::error::ConfigError;
use crate::models::{CategoryRecord, PersonalRecord, SectionKey};
use crate::store::{RecordStore, StoreConnector};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn personal_url(&self, person_id: u64) -> String {
        format!("{}/persons/{}/personal", self.base_url, person_id)
    }

    fn section_url(&self, person_id: u64, key: SectionKey) -> String {
        format!(
            "{}/persons/{}/sections/{}",
            self.base_url,
            person_id,
            key.as_str()
        )
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_personal(&self, person_id: u64) -> Result<Option<PersonalRecord>> {
        let url = self.personal_url(person_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = response
            .error_for_status()
            .with_context(|| format!("存储返回错误状态: {}", url))?
            .json::<PersonalRecord>()
            .await
            .with_context(|| format!("个人信息解析失败: {}", url))?;
        Ok(Some(record))
    }

    async fn fetch_section(&self, person_id: u64, key: SectionKey) -> Result<Vec<CategoryRecord>> {
        let url = self.section_url(person_id, key);
        debug!("GET {}", url);

        let records = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", url))?
            .error_for_status()
            .with_context(|| format!("存储返回错误状态: {}", url))?
            .json::<Vec<CategoryRecord>>()
            .await
            .with_context(|| format!("分类记录解析失败: {}", url))?;
        Ok(records)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("健康检查失败 ({}): {}", url, e);
                false
            }
        }
    }
}

/// HTTP 存储连接器；每次连接创建新的连接池
pub struct HttpConnector {
    base_url: String,
    pool_size: usize,
    request_timeout: Duration,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>, pool_size: usize, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            pool_size,
            request_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base_url = config
            .record_store_url
            .clone()
            .ok_or_else(|| ConfigError::Store("RECORD_STORE_URL 未设置".to_string()))?;
        Ok(Self::new(
            base_url,
            config.store_pool_size,
            config.fetch_timeout(),
        ))
    }

    fn build_client(&self) -> Result<Client, ConfigError> {
        Client::builder()
            .pool_max_idle_per_host(self.pool_size)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ConfigError::Store(e.to_string()))
    }
}

#[async_trait]
impl StoreConnector for HttpConnector {
    async fn connect(&self) -> Result<Arc<dyn RecordStore>> {
        let client = self.build_client()?;
        let store = HttpRecordStore::new(client, self.base_url.clone());
        if !store.is_healthy().await {
            anyhow::bail!("记录存储健康检查未通过: {}", self.base_url);
        }
        Ok(Arc::new(store))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
