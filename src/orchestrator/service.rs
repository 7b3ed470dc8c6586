//! 生成流程编排
//!
//! 每个请求独立经过：校验 → 聚合 → 构建块 → 渲染 → 响应。
//! 各阶段之间不重试；除样式注册表与数据源外不共享任何可变状态。

use crate::aggregator::Aggregator;
use crate::blocks::build_blocks;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::SectionKey;
use crate::orchestrator::request::{GenerateRequest, PreviewRequest};
use crate::orchestrator::response::{filename, Response};
use crate::render::{ChromiumEngine, OutputFormat, PdfRenderer, Renderer, WordRenderer};
use crate::store::DataSource;
use crate::template::StyleRegistry;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// 单个请求的流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Aggregating,
    BuildingBlocks,
    Rendering,
    Responding,
    Succeeded,
    Failed(&'static str),
}

pub struct CvService {
    registry: Arc<StyleRegistry>,
    aggregator: Aggregator,
    pdf: Arc<dyn Renderer>,
    word: Arc<dyn Renderer>,
    production: bool,
}

impl CvService {
    pub fn new(
        registry: Arc<StyleRegistry>,
        aggregator: Aggregator,
        pdf: Arc<dyn Renderer>,
        word: Arc<dyn Renderer>,
        production: bool,
    ) -> Self {
        Self {
            registry,
            aggregator,
            pdf,
            word,
            production,
        }
    }

    /// 按配置组装：内置模板、Chromium 引擎、DOCX 渲染器
    pub fn from_config(config: &Config, data_source: Arc<DataSource>) -> AppResult<Self> {
        let registry = Arc::new(StyleRegistry::new()?);
        let engine = Arc::new(ChromiumEngine::from_config(config));
        let pdf = Arc::new(PdfRenderer::new(engine, config.render_timeout()));

        Ok(Self::new(
            registry,
            Aggregator::new(data_source, config),
            pdf,
            Arc::new(WordRenderer::new()),
            config.production,
        ))
    }

    fn renderer(&self, format: OutputFormat) -> &dyn Renderer {
        match format {
            OutputFormat::Pdf => self.pdf.as_ref(),
            OutputFormat::Word => self.word.as_ref(),
        }
    }

    /// 处理生成请求；任何错误都转换为对应状态码的响应
    pub async fn generate(&self, request: &GenerateRequest) -> Response {
        let span = info_span!(
            "generate",
            person_id = %request.person_id,
            template = %request.template,
            format = %request.format
        );

        async {
            match self.run_generate(request).await {
                Ok(response) => {
                    transition(Stage::Succeeded);
                    response
                }
                Err(e) => self.fail(e),
            }
        }
        .instrument(span)
        .await
    }

    async fn run_generate(&self, request: &GenerateRequest) -> AppResult<Response> {
        transition(Stage::Validating);
        let valid = request.validate()?;

        transition(Stage::Aggregating);
        let model = self
            .aggregator
            .aggregate(valid.person_id, &valid.sections)
            .await?;

        transition(Stage::BuildingBlocks);
        let sheet = self.registry.sheet(valid.template);
        let requested: Vec<SectionKey> = valid.sections.iter().copied().collect();
        let blocks = build_blocks(&model, &requested, sheet).map_err(|_| AppError::MissingIdentity {
            person_id: valid.person_id,
        })?;

        transition(Stage::Rendering);
        let bytes = self.renderer(valid.format).render(&blocks, sheet).await?;

        transition(Stage::Responding);
        let name = filename(
            model.person_name().unwrap_or_default(),
            valid.template,
            valid.format,
            chrono::Local::now().date_naive(),
        );
        info!("✅ 生成完成: {} ({} 字节)", name, bytes.len());
        Ok(Response::document(valid.format, name, bytes))
    }

    /// 处理预览请求：只聚合，不渲染
    pub async fn preview(&self, request: &PreviewRequest) -> Response {
        let span = info_span!("preview", person_id = %request.person_id);

        async {
            match self.run_preview(request).await {
                Ok(response) => {
                    transition(Stage::Succeeded);
                    response
                }
                Err(e) => self.fail(e),
            }
        }
        .instrument(span)
        .await
    }

    async fn run_preview(&self, request: &PreviewRequest) -> AppResult<Response> {
        transition(Stage::Validating);
        let valid = request.validate()?;

        transition(Stage::Aggregating);
        let model = self
            .aggregator
            .aggregate(valid.person_id, &valid.sections)
            .await?;

        transition(Stage::Responding);
        Ok(Response::json(serde_json::to_vec(&model)?))
    }

    fn fail(&self, err: AppError) -> Response {
        match &err {
            AppError::Validation(e) => warn!("请求参数错误: {}", e),
            AppError::MissingIdentity { person_id } => warn!("[人员 {}] 缺少个人信息", person_id),
            other => error!("❌ 生成失败: {}", other),
        }
        transition(Stage::Failed(err.kind()));
        Response::from_error(&err, self.production)
    }
}

fn transition(stage: Stage) {
    debug!("→ {:?}", stage);
}
