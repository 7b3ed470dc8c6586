//! 数据源 - 存储句柄的唯一持有者
//!
//! 生命周期：首次使用时创建 → 健康时复用 → 探测到断开时重建 → 进程退出时显式关闭

use crate::error::{AppError, AppResult, StoreError};
use crate::store::{RecordStore, StoreConnector};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct DataSource {
    connector: Box<dyn StoreConnector>,
    handle: Mutex<Option<Arc<dyn RecordStore>>>,
    closed: AtomicBool,
}

impl DataSource {
    /// 创建数据源；此时不建立连接
    pub fn new(connector: impl StoreConnector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            handle: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// 获取可用的存储句柄
    ///
    /// 健康探测在锁外进行，只有重建连接时才持锁。
    pub async fn acquire(&self) -> AppResult<Arc<dyn RecordStore>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::ShutDown.into());
        }

        let current = self.handle.lock().await.clone();
        if let Some(handle) = &current {
            if handle.is_healthy().await {
                return Ok(handle.clone());
            }
        }

        let mut guard = self.handle.lock().await;

        // 关闭与重建可能并发，持锁后再确认一次
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::ShutDown.into());
        }

        if let Some(existing) = guard.take() {
            let stale = current
                .as_ref()
                .is_some_and(|probed| same_handle(&existing, probed));
            if !stale {
                // 探测期间已被其他请求建立或重建
                *guard = Some(existing.clone());
                return Ok(existing);
            }
            warn!("存储连接已断开，正在重建: {}", self.connector.describe());
            existing.close().await;
        }

        debug!("正在连接记录存储: {}", self.connector.describe());
        let handle = self
            .connector
            .connect()
            .await
            .map_err(AppError::store_unavailable)?;
        info!("✓ 记录存储已连接: {}", self.connector.describe());

        *guard = Some(handle.clone());
        Ok(handle)
    }

    /// 是否已建立过连接（且尚未关闭）
    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    /// 关闭数据源；之后的 acquire 都会失败
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(handle) = self.handle.lock().await.take() {
            handle.close().await;
            info!("记录存储已关闭: {}", self.connector.describe());
        }
    }
}

fn same_handle(a: &Arc<dyn RecordStore>, b: &Arc<dyn RecordStore>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
