use crate::blocks::Block;
use crate::error::RenderError;
use crate::render::engine::RenderEngine;
use crate::render::html::to_markup;
use crate::render::{OutputFormat, Renderer};
use crate::template::StyleSheet;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// 固定版式渲染器：块 → HTML → 外部引擎排版
pub struct PdfRenderer {
    engine: Arc<dyn RenderEngine>,
    timeout: Duration,
}

impl PdfRenderer {
    pub fn new(engine: Arc<dyn RenderEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }
}

#[async_trait]
impl Renderer for PdfRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    async fn render(&self, blocks: &[Block], sheet: &StyleSheet) -> Result<Vec<u8>, RenderError> {
        let markup = to_markup(blocks, sheet);
        debug!("HTML 标记生成完成: {} 字节", markup.len());

        let bytes = self.engine.print_pdf(&markup, self.timeout).await?;

        if !bytes.starts_with(PDF_MAGIC) {
            error!("渲染引擎输出不是 PDF ({} 字节)", bytes.len());
            return Err(RenderError::engine("engine output is not a PDF document"));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{HeaderBlock, Text};
    use crate::template::{StyleRegistry, StyleSlot, TemplateId};

    struct StaticEngine(Vec<u8>);

    #[async_trait]
    impl RenderEngine for StaticEngine {
        async fn print_pdf(&self, markup: &str, _limit: Duration) -> Result<Vec<u8>, RenderError> {
            assert!(markup.starts_with("<!DOCTYPE html>"));
            Ok(self.0.clone())
        }
    }

    fn blocks() -> Vec<Block> {
        vec![Block::Header(HeaderBlock {
            name: Text::new(StyleSlot::Name, "Asha Rao"),
            subtitle: None,
            affiliation: None,
            contact: None,
            photo: None,
        })]
    }

    #[tokio::test]
    async fn test_pdf_output_passes_through() {
        let registry = StyleRegistry::new().unwrap();
        let renderer = PdfRenderer::new(
            Arc::new(StaticEngine(b"%PDF-1.7 fake".to_vec())),
            Duration::from_secs(5),
        );
        let bytes = renderer
            .render(&blocks(), registry.sheet(TemplateId::Classic))
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(renderer.format(), OutputFormat::Pdf);
    }

    #[tokio::test]
    async fn test_unexpected_engine_output_is_engine_error() {
        let registry = StyleRegistry::new().unwrap();
        let renderer = PdfRenderer::new(
            Arc::new(StaticEngine(b"<html>oops".to_vec())),
            Duration::from_secs(5),
        );
        let result = renderer
            .render(&blocks(), registry.sheet(TemplateId::Classic))
            .await;
        assert!(matches!(result, Err(RenderError::Engine { .. })));
    }
}
