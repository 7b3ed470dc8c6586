//! # CV Forge
//!
//! 把一个人的各类履历记录聚合成统一的文档模型，并按所选模板渲染为
//! PDF（固定版式）或 DOCX（可编辑）文档。
//!
//! ## 架构设计
//!
//! ### ① 数据层
//! - `models/` - `SectionKey`（封闭的分类集合与规范顺序）、记录类型、`DocumentModel`
//! - `store/` - `RecordStore` 抓取契约、`DataSource` 生命周期、HTTP 与 TOML 目录两种实现
//!
//! ### ② 样式层
//! - `template/` - 15 个样式槽位、四套内置模板，注册表构造时校验完整性
//!
//! ### ③ 流程层
//! - `aggregator/` - 有界并发抓取，单个分类失败降级为空
//! - `blocks/` - 按规范顺序生成与渲染器无关的块序列
//! - `render/` - `Renderer` 接口的两个实现：HTML → 无头浏览器 → PDF，以及原生 DOCX
//!
//! ### ④ 编排层
//! - `orchestrator/` - 请求校验、流程驱动、响应封装、批量生成
//!
//! ## 模块结构

pub mod aggregator;
pub mod blocks;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod store;
pub mod template;

// 重新导出常用类型
pub use aggregator::Aggregator;
pub use blocks::{build_blocks, Block};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CategoryRecord, DocumentModel, PersonalRecord, SectionKey};
pub use orchestrator::{App, CvService, GenerateRequest, PreviewRequest, Response};
pub use render::{OutputFormat, Renderer};
pub use store::{DataSource, RecordStore};
pub use template::{StyleRegistry, StyleSlot, TemplateId};
