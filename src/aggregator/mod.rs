//! 数据聚合器
//!
//! ## 职责
//!
//! 1. **个人信息**：无条件抓取，缺失即失败（`MissingIdentity`）
//! 2. **分类抓取**：每个请求的分类一次独立抓取，用 Semaphore 限制并发
//! 3. **容错**：单个分类抓取失败或超时只记录日志，该分类降级为空
//! 4. **确定性**：结果按 `SectionKey` 存放，与抓取完成顺序无关

use crate::config::Config;
use crate::error::{AppError, AppResult, DataFetchError, StoreError};
use crate::models::{CategoryRecord, DocumentModel, SectionKey};
use crate::store::{DataSource, RecordStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub struct Aggregator {
    data_source: Arc<DataSource>,
    max_concurrent_fetches: usize,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(data_source: Arc<DataSource>, config: &Config) -> Self {
        Self::with_limits(
            data_source,
            config.max_concurrent_fetches,
            config.fetch_timeout(),
        )
    }

    pub fn with_limits(
        data_source: Arc<DataSource>,
        max_concurrent_fetches: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            data_source,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
            fetch_timeout,
        }
    }

    /// 聚合某人的文档模型
    pub async fn aggregate(
        &self,
        person_id: u64,
        sections: &BTreeSet<SectionKey>,
    ) -> AppResult<DocumentModel> {
        let store = self.data_source.acquire().await?;

        let personal = match timeout(self.fetch_timeout, store.fetch_personal(person_id)).await {
            Ok(Ok(Some(personal))) => personal,
            Ok(Ok(None)) => {
                warn!("[人员 {}] 缺少个人信息，终止生成", person_id);
                return Err(AppError::MissingIdentity { person_id });
            }
            Ok(Err(e)) => return Err(AppError::personal_fetch_failed(person_id, e)),
            Err(_) => {
                return Err(StoreError::PersonalTimeout {
                    person_id,
                    timeout_secs: self.fetch_timeout.as_secs(),
                }
                .into())
            }
        };

        let mut model = DocumentModel::new(personal);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        // JoinSet 被丢弃时会中止尚未完成的抓取
        let mut tasks = JoinSet::new();

        debug!(
            "[人员 {}] 开始抓取 {} 个分类 (并发上限 {})",
            person_id,
            sections.len(),
            self.max_concurrent_fetches
        );

        for &key in sections {
            let store = store.clone();
            let semaphore = semaphore.clone();
            let fetch_timeout = self.fetch_timeout;

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => fetch_section(store.as_ref(), person_id, key, fetch_timeout).await,
                    Err(e) => Err(DataFetchError::Aborted {
                        key,
                        reason: e.to_string(),
                    }),
                };
                (key, outcome)
            });
        }

        let mut degraded = 0usize;
        while let Some(joined) = tasks.join_next().await {
            let (key, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    // 任务 panic 时拿不到分类键，剩余未写入的分类在下面补为空
                    warn!("[人员 {}] ⚠️ 分类抓取任务异常: {}", person_id, e);
                    degraded += 1;
                    continue;
                }
            };

            let records = match outcome {
                Ok(records) => records,
                Err(e) => {
                    warn!("[人员 {}] ⚠️ 分类降级为空: {}", person_id, e);
                    degraded += 1;
                    Vec::new()
                }
            };
            model.insert(key, records);
        }

        for &key in sections {
            if !model.sections.contains_key(&key) {
                model.insert(key, Vec::new());
            }
        }

        info!(
            "[人员 {}] ✓ 聚合完成: {} 个分类, {} 个降级",
            person_id,
            sections.len(),
            degraded
        );

        Ok(model)
    }
}

async fn fetch_section(
    store: &dyn RecordStore,
    person_id: u64,
    key: SectionKey,
    fetch_timeout: Duration,
) -> Result<Vec<CategoryRecord>, DataFetchError> {
    match timeout(fetch_timeout, store.fetch_section(person_id, key)).await {
        Ok(Ok(records)) => {
            debug!("[人员 {}] 分类 {} 共 {} 条", person_id, key, records.len());
            Ok(records)
        }
        Ok(Err(source)) => Err(DataFetchError::Failed { key, source }),
        Err(_) => Err(DataFetchError::TimedOut {
            key,
            timeout_secs: fetch_timeout.as_secs(),
        }),
    }
}
