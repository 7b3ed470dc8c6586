//! 批量生成 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：选择记录存储（HTTP 或本地 TOML 目录），组装 `CvService`
//! 2. **批量加载**：读取请求文件（单个请求或请求数组）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的请求数量
//! 4. **结果落盘**：成功的文档写入输出目录，失败的请求记录日志
//! 5. **资源管理**：结束时显式关闭数据源

use crate::config::Config;
use crate::orchestrator::request::GenerateRequest;
use crate::orchestrator::service::CvService;
use crate::store::{DataSource, FileConnector, HttpConnector};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    data_source: Arc<DataSource>,
    service: Arc<CvService>,
}

/// 请求文件：单个请求或请求数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RequestFile {
    Many(Vec<GenerateRequest>),
    One(GenerateRequest),
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    /// 已写出的文件
    pub written: Vec<PathBuf>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let data_source = Arc::new(build_data_source(&config)?);
        let service = CvService::from_config(&config, data_source.clone())
            .context("初始化生成服务失败")?;

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", config.output_dir.display()))?;

        Ok(Self {
            config,
            data_source,
            service: Arc::new(service),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let requests = load_requests(&self.config.request_file).await?;

        if requests.is_empty() {
            warn!("⚠️ 请求文件中没有待处理的请求，程序结束");
            self.data_source.shutdown().await;
            return Ok(ProcessingStats::default());
        }

        log_requests_loaded(requests.len(), self.config.max_concurrent_requests);

        let stats = process_all_requests(
            self.service.clone(),
            requests,
            &self.config.output_dir,
            self.config.max_concurrent_requests,
        )
        .await;

        print_final_stats(&stats, &self.config);
        self.data_source.shutdown().await;

        Ok(stats)
    }
}

fn build_data_source(config: &Config) -> Result<DataSource> {
    match &config.record_store_url {
        Some(url) => {
            info!("🌐 记录存储: {}", url);
            let connector = HttpConnector::from_config(config)?;
            Ok(DataSource::new(connector))
        }
        None => {
            info!("📁 记录存储目录: {}", config.record_store_dir.display());
            Ok(DataSource::new(FileConnector::new(&config.record_store_dir)))
        }
    }
}

/// 加载请求文件
async fn load_requests(path: &Path) -> Result<Vec<GenerateRequest>> {
    info!("\n📁 正在读取请求文件: {}", path.display());
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取请求文件: {}", path.display()))?;

    let parsed: RequestFile = serde_json::from_str(&content)
        .with_context(|| format!("无法解析请求文件: {}", path.display()))?;

    Ok(match parsed {
        RequestFile::Many(requests) => requests,
        RequestFile::One(request) => vec![request],
    })
}

/// 并发处理全部请求
async fn process_all_requests(
    service: Arc<CvService>,
    requests: Vec<GenerateRequest>,
    output_dir: &Path,
    max_concurrent: usize,
) -> ProcessingStats {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut stats = ProcessingStats {
        total: requests.len(),
        ..Default::default()
    };
    let mut handles = Vec::with_capacity(requests.len());

    for (idx, request) in requests.into_iter().enumerate() {
        let index = idx + 1;
        let service = service.clone();
        let semaphore = semaphore.clone();
        let output_dir = output_dir.to_path_buf();

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            process_single_request(&service, &request, index, &output_dir).await
        });
        handles.push((index, handle));
    }

    for (index, handle) in handles {
        match handle.await {
            Ok(Ok(Some(path))) => {
                stats.success += 1;
                stats.written.push(path);
            }
            Ok(Ok(None)) => stats.failed += 1,
            Ok(Err(e)) => {
                error!("[请求 {}] ❌ 处理过程中发生错误: {}", index, e);
                stats.failed += 1;
            }
            Err(e) => {
                error!("[请求 {}] 任务执行失败: {}", index, e);
                stats.failed += 1;
            }
        }
    }

    stats.written.sort();
    stats
}

/// 处理单个请求；成功时返回写出的文件路径
async fn process_single_request(
    service: &CvService,
    request: &GenerateRequest,
    index: usize,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let response = service.generate(request).await;

    let Some(filename) = response.filename.as_deref().filter(|_| response.is_success()) else {
        let detail = response
            .error_body()
            .map(|body| match body.message {
                Some(message) => format!("{}: {}", body.error, message),
                None => body.error,
            })
            .unwrap_or_default();
        warn!("[请求 {}] ⚠️ 生成失败 ({}) {}", index, response.status, detail);
        return Ok(None);
    };

    let path = output_dir.join(filename);
    tokio::fs::write(&path, &response.body)
        .await
        .with_context(|| format!("无法写入文件: {}", path.display()))?;
    info!("[请求 {}] 💾 已保存: {}", index, path.display());

    Ok(Some(path))
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量简历生成模式");
    info!("📊 最大并发请求数: {}", config.max_concurrent_requests);
    info!("🧵 单请求分类抓取并发: {}", config.max_concurrent_fetches);
    info!("{}", "=".repeat(60));
}

fn log_requests_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的请求", total);
    info!("📋 最多同时处理 {} 个\n", max_concurrent);
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n输出目录: {}", config.output_dir.display());
}
