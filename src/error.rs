use crate::models::SectionKey;
use crate::template::{StyleSlot, TemplateId};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求参数错误（400，不访问存储）
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 缺少个人信息（422）
    #[error("personal information required (person {person_id})")]
    MissingIdentity { person_id: u64 },
    /// 存储层错误
    #[error(transparent)]
    Store(#[from] StoreError),
    /// 渲染错误
    #[error(transparent)]
    Render(#[from] RenderError),
    /// 模板注册表错误
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 预览数据编码失败
    #[error("failed to encode preview: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 请求参数错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("personId must be a positive integer, got {0}")]
    InvalidPersonId(String),
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("unknown format '{0}', expected 'pdf' or 'word'")]
    UnknownFormat(String),
    #[error("at least one section must be requested")]
    EmptySections,
    #[error("unknown section '{0}'")]
    UnknownSection(String),
}

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 无法建立存储连接
    #[error("record store unavailable: {source}")]
    Unavailable { source: anyhow::Error },
    /// 数据源已关闭
    #[error("record store has been shut down")]
    ShutDown,
    /// 个人信息抓取失败（致命）
    #[error("failed to fetch personal record for person {person_id}: {source}")]
    PersonalFetch {
        person_id: u64,
        source: anyhow::Error,
    },
    /// 个人信息抓取超时（致命）
    #[error("personal record fetch for person {person_id} timed out after {timeout_secs}s")]
    PersonalTimeout { person_id: u64, timeout_secs: u64 },
}

/// 单个分类抓取失败
///
/// 只在聚合器内部记录日志，分类降级为空，不会传给调用方。
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("section '{key}' fetch failed: {source}")]
    Failed {
        key: SectionKey,
        source: anyhow::Error,
    },
    #[error("section '{key}' fetch timed out after {timeout_secs}s")]
    TimedOut { key: SectionKey, timeout_secs: u64 },
    #[error("section '{key}' fetch task aborted: {reason}")]
    Aborted { key: SectionKey, reason: String },
}

/// 渲染错误；任何一种都不返回部分产物
#[derive(Debug, Error)]
pub enum RenderError {
    /// 渲染引擎崩溃或输出异常
    #[error("render engine failed: {message}")]
    Engine { message: String },
    /// 渲染超时，引擎进程已被强制结束
    #[error("render timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    /// 文档打包失败
    #[error("failed to package document: {message}")]
    Package { message: String },
}

impl RenderError {
    pub fn engine(message: impl Into<String>) -> Self {
        RenderError::Engine {
            message: message.into(),
        }
    }

    pub fn package(message: impl Into<String>) -> Self {
        RenderError::Package {
            message: message.into(),
        }
    }
}

impl From<chromiumoxide::error::CdpError> for RenderError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        RenderError::engine(err.to_string())
    }
}

impl From<zip::result::ZipError> for RenderError {
    fn from(err: zip::result::ZipError) -> Self {
        RenderError::package(err.to_string())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::package(err.to_string())
    }
}

/// 文档模型缺少个人信息，无法生成页眉
#[derive(Debug, Error, PartialEq, Eq)]
#[error("document model has no personal record")]
pub struct MissingPersonal;

/// 模板注册表构造错误
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("template '{template}' is missing style slots: {missing:?}")]
    MissingSlots {
        template: TemplateId,
        missing: Vec<StyleSlot>,
    },
    #[error("template '{template}' defines slot {slot} more than once")]
    DuplicateSlot { template: TemplateId, slot: StyleSlot },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 存储客户端配置无效
    #[error("invalid record store configuration: {0}")]
    Store(String),
}

impl AppError {
    /// 日志与状态机使用的简短分类名
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::MissingIdentity { .. } => "missing_identity",
            AppError::Store(_) => "store",
            AppError::Render(RenderError::Timeout { .. }) => "render_timeout",
            AppError::Render(_) => "render_engine",
            AppError::Registry(_) => "registry",
            AppError::Config(_) => "config",
            AppError::Encode(_) => "encode",
        }
    }

    /// 创建存储不可用错误
    pub fn store_unavailable(source: impl Into<anyhow::Error>) -> Self {
        AppError::Store(StoreError::Unavailable {
            source: source.into(),
        })
    }

    /// 创建个人信息抓取失败错误
    pub fn personal_fetch_failed(person_id: u64, source: impl Into<anyhow::Error>) -> Self {
        AppError::Store(StoreError::PersonalFetch {
            person_id,
            source: source.into(),
        })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
