//! 外部记录存储 - 基础设施层
//!
//! ## 约定
//!
//! - `fetch_section` 返回空集合表示"没有数据"，返回错误表示"抓取失败"，两者不可混用
//! - `fetch_personal` 返回 `Ok(None)` 表示此人没有个人信息
//! - 存储句柄由 [`DataSource`] 管理生命周期，聚合器只通过它获取句柄

pub mod data_source;
pub mod file_store;
pub mod http_store;

pub use data_source::DataSource;
pub use file_store::{FileConnector, FileRecordStore};
pub use http_store::{HttpConnector, HttpRecordStore};

use crate::models::{CategoryRecord, PersonalRecord, SectionKey};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// 记录存储
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 抓取个人信息
    async fn fetch_personal(&self, person_id: u64) -> Result<Option<PersonalRecord>>;

    /// 抓取某个分类的全部记录
    async fn fetch_section(&self, person_id: u64, key: SectionKey) -> Result<Vec<CategoryRecord>>;

    /// 健康检查；返回 false 时数据源会重建句柄
    async fn is_healthy(&self) -> bool {
        true
    }

    /// 释放连接
    async fn close(&self) {}
}

/// 存储句柄工厂
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn RecordStore>>;

    /// 日志中显示的名称
    fn describe(&self) -> String;
}
