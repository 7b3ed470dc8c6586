//! 渲染层
//!
//! 两个渲染器实现同一个 [`Renderer`] 接口，彼此不共享实现，
//! 唯一的共同输入是块序列和样式表。

pub mod docx;
pub mod engine;
pub mod html;
pub mod pdf;

pub use docx::WordRenderer;
pub use engine::{ChromiumEngine, RenderEngine};
pub use pdf::PdfRenderer;

use crate::blocks::Block;
use crate::error::RenderError;
use crate::template::StyleSheet;
use async_trait::async_trait;
use std::fmt;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Pdf,
    Word,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(OutputFormat::Pdf),
            "word" | "docx" => Some(OutputFormat::Word),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Word => "docx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Word => write!(f, "word"),
        }
    }
}

/// 渲染器：块序列 + 样式表 → 完整的二进制文档
///
/// 失败时不返回任何部分产物。
#[async_trait]
pub trait Renderer: Send + Sync {
    fn format(&self) -> OutputFormat;

    async fn render(&self, blocks: &[Block], sheet: &StyleSheet) -> Result<Vec<u8>, RenderError>;
}
