//! 渲染引擎 - 基础设施层
//!
//! 每次渲染启动一个全新的无头浏览器进程，渲染结束后无论成功、失败还是超时都会结束该进程。

use crate::config::Config;
use crate::error::RenderError;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, error, info, warn};

/// 关闭浏览器时等待其自行退出的时间
const CLOSE_GRACE: Duration = Duration::from_secs(3);

static RENDER_SEQ: AtomicU64 = AtomicU64::new(0);

/// 把 HTML 排版为 PDF 的外部引擎
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// 在 `limit` 时间内完成排版；超时必须结束引擎进程并返回 `RenderError::Timeout`
    async fn print_pdf(&self, markup: &str, limit: Duration) -> Result<Vec<u8>, RenderError>;
}

/// 基于 chromiumoxide 的无头浏览器引擎
pub struct ChromiumEngine {
    executable: Option<PathBuf>,
    permits: Arc<Semaphore>,
}

impl ChromiumEngine {
    pub fn new(executable: Option<PathBuf>, max_concurrent_renders: usize) -> Self {
        Self {
            executable,
            permits: Arc::new(Semaphore::new(max_concurrent_renders.max(1))),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.chrome_executable.clone(), config.max_concurrent_renders)
    }

    fn browser_config(&self, user_data_dir: PathBuf, limit: Duration) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .new_headless_mode()
            .user_data_dir(user_data_dir)
            .launch_timeout(limit)
            .args(vec![
                "--disable-gpu",           // 无头模式禁用 GPU
                "--no-sandbox",            // 容器内没有沙盒权限
                "--disable-dev-shm-usage", // 防止共享内存不足
                "--disable-extensions",
            ]);

        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            RenderError::engine(format!("配置无头浏览器失败: {}", e))
        })
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    /// 排队、启动、排版共用同一个截止时间
    async fn print_pdf(&self, markup: &str, limit: Duration) -> Result<Vec<u8>, RenderError> {
        let deadline = Instant::now() + limit;
        let timed_out = |phase: &str| {
            error!("❌ 渲染超时 ({}s, {})", limit.as_secs(), phase);
            RenderError::Timeout {
                timeout_secs: limit.as_secs(),
            }
        };

        let _permit = match timeout_at(deadline, self.permits.acquire()).await {
            Ok(permit) => permit.map_err(|e| RenderError::engine(e.to_string()))?,
            Err(_) => return Err(timed_out("等待渲染名额")),
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(timed_out("等待渲染名额"));
        }

        let seq = RENDER_SEQ.fetch_add(1, Ordering::Relaxed);
        let user_data_dir =
            std::env::temp_dir().join(format!("cv-forge-{}-{}", std::process::id(), seq));
        let config = self.browser_config(user_data_dir.clone(), remaining)?;

        // 启动超时由 chromiumoxide 的 launch_timeout 负责，它会自行结束子进程
        let outcome = match RenderContext::acquire(config).await {
            Ok(context) => match timeout_at(deadline, context.print(markup)).await {
                Ok(result) => {
                    context.release(true).await;
                    result
                }
                Err(_) => {
                    context.release(false).await;
                    Err(timed_out("排版"))
                }
            },
            Err(_) if Instant::now() >= deadline => Err(timed_out("启动浏览器")),
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_dir_all(&user_data_dir).await {
            debug!("清理浏览器数据目录失败 {}: {}", user_data_dir.display(), e);
        }

        outcome
    }
}

/// 单次渲染独占的浏览器进程
///
/// 必须调用 [`RenderContext::release`]；若上层 future 被丢弃，
/// `Browser` 的 Drop 会兜底结束子进程。
struct RenderContext {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl RenderContext {
    async fn acquire(config: BrowserConfig) -> Result<Self, RenderError> {
        info!("🚀 启动无头浏览器...");

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            RenderError::engine(format!("启动无头浏览器失败: {}", e))
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    async fn print(&self, markup: &str) -> Result<Vec<u8>, RenderError> {
        let page = self.browser.new_page("about:blank").await.map_err(|e| {
            error!("创建页面失败: {}", e);
            RenderError::engine(format!("创建页面失败: {}", e))
        })?;

        page.set_content(markup).await?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            ..Default::default()
        };
        let bytes = page.pdf(params).await?;
        debug!("PDF 排版完成: {} 字节", bytes.len());
        Ok(bytes)
    }

    /// 结束浏览器进程：`graceful` 时先正常关闭，失败或超时则强制结束
    async fn release(mut self, graceful: bool) {
        let closed = graceful
            && match timeout(CLOSE_GRACE, self.browser.close()).await {
                Ok(Ok(_)) => matches!(timeout(CLOSE_GRACE, self.browser.wait()).await, Ok(Ok(_))),
                Ok(Err(e)) => {
                    warn!("关闭浏览器失败: {}", e);
                    false
                }
                Err(_) => false,
            };

        if !closed {
            if graceful {
                warn!("⚠️ 浏览器未能正常退出，强制结束进程");
            }
            if let Some(Err(e)) = self.browser.kill().await {
                error!("强制结束浏览器进程失败: {}", e);
            }
        }

        self.handler.abort();
        debug!("浏览器进程已释放");
    }
}
