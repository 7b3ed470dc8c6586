//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `request` - 请求结构与校验
//! - personId / template / format / sections 全部在访问存储前校验
//!
//! ### `service` - 单个请求的流程
//! - 校验 → 聚合 → 构建块 → 渲染 → 响应
//! - 错误统一转换为带状态码的响应
//!
//! ### `response` - 响应封装
//! - Content-Type、附件文件名、错误 JSON
//!
//! ### `batch_processor` - 批量生成
//! - 读取请求文件，并发生成并写入输出目录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<GenerateRequest>)
//!     ↓
//! service::CvService (处理单个请求)
//!     ↓
//! aggregator → blocks → render
//!     ↓
//! store (DataSource / RecordStore)
//! ```

pub mod batch_processor;
pub mod request;
pub mod response;
pub mod service;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use request::{GenerateRequest, PreviewRequest, ValidGenerate, ValidPreview};
pub use response::{filename, ErrorBody, Response};
pub use service::{CvService, Stage};
