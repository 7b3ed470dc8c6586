//! 集成测试共用的替身与工具
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cv_forge::error::RenderError;
use cv_forge::models::{CategoryRecord, PersonalRecord, SectionKey};
use cv_forge::render::{PdfRenderer, RenderEngine, WordRenderer};
use cv_forge::store::{DataSource, RecordStore, StoreConnector};
use cv_forge::template::{StyleRegistry, StyleSlot};
use cv_forge::{Aggregator, CvService};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ========== 记录存储替身 ==========

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub personal: Option<PersonalRecord>,
    pub sections: HashMap<SectionKey, Vec<CategoryRecord>>,
}

/// 内存记录存储：统计调用次数，可注入失败与延迟
#[derive(Default)]
pub struct MockStore {
    persons: HashMap<u64, Person>,
    failing: HashSet<SectionKey>,
    slow: HashMap<SectionKey, Duration>,
    delay: Duration,
    personal_delay: Duration,
    pub personal_calls: AtomicUsize,
    pub section_calls: AtomicUsize,
    pub section_completions: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_person(mut self, person_id: u64, person: Person) -> Self {
        self.persons.insert(person_id, person);
        self
    }

    pub fn failing(mut self, key: SectionKey) -> Self {
        self.failing.insert(key);
        self
    }

    pub fn slow(mut self, key: SectionKey, delay: Duration) -> Self {
        self.slow.insert(key, delay);
        self
    }

    /// 每次分类抓取的固定延迟
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_personal_delay(mut self, delay: Duration) -> Self {
        self.personal_delay = delay;
        self
    }

    pub fn fetches(&self) -> usize {
        self.personal_calls.load(Ordering::SeqCst) + self.section_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn fetch_personal(&self, person_id: u64) -> Result<Option<PersonalRecord>> {
        self.personal_calls.fetch_add(1, Ordering::SeqCst);
        if !self.personal_delay.is_zero() {
            tokio::time::sleep(self.personal_delay).await;
        }
        Ok(self
            .persons
            .get(&person_id)
            .and_then(|p| p.personal.clone()))
    }

    async fn fetch_section(&self, person_id: u64, key: SectionKey) -> Result<Vec<CategoryRecord>> {
        self.section_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.slow.get(&key).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.section_completions.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&key) {
            return Err(anyhow!("connection reset while reading {}", key));
        }
        Ok(self
            .persons
            .get(&person_id)
            .and_then(|p| p.sections.get(&key).cloned())
            .unwrap_or_default())
    }
}

pub struct MockConnector(pub Arc<MockStore>);

#[async_trait]
impl StoreConnector for MockConnector {
    async fn connect(&self) -> Result<Arc<dyn RecordStore>> {
        let store: Arc<dyn RecordStore> = self.0.clone();
        Ok(store)
    }

    fn describe(&self) -> String {
        "memory://mock".to_string()
    }
}

pub fn data_source(store: &Arc<MockStore>) -> Arc<DataSource> {
    Arc::new(DataSource::new(MockConnector(store.clone())))
}

// ========== 渲染引擎替身 ==========

#[derive(Debug, Clone, Copy)]
pub enum EngineMode {
    Ok,
    /// 排版耗时；超过限时即报超时
    Slow(Duration),
    Crash,
}

/// 记录收到的 HTML，返回伪造的 PDF
pub struct FakeEngine {
    mode: EngineMode,
    pub markups: Mutex<Vec<String>>,
}

impl FakeEngine {
    pub fn new(mode: EngineMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            markups: Mutex::new(Vec::new()),
        })
    }

    pub fn last_markup(&self) -> Option<String> {
        self.markups.lock().ok().and_then(|m| m.last().cloned())
    }
}

#[async_trait]
impl RenderEngine for FakeEngine {
    async fn print_pdf(&self, markup: &str, limit: Duration) -> Result<Vec<u8>, RenderError> {
        if let Ok(mut markups) = self.markups.lock() {
            markups.push(markup.to_string());
        }
        match self.mode {
            EngineMode::Ok => {}
            EngineMode::Slow(cost) => {
                if tokio::time::timeout(limit, tokio::time::sleep(cost)).await.is_err() {
                    return Err(RenderError::Timeout {
                        timeout_secs: limit.as_secs(),
                    });
                }
            }
            EngineMode::Crash => return Err(RenderError::engine("renderer process crashed")),
        }
        let mut bytes = b"%PDF-1.7\n".to_vec();
        bytes.extend_from_slice(markup.as_bytes());
        Ok(bytes)
    }
}

// ========== 服务组装 ==========

pub struct Harness {
    pub store: Arc<MockStore>,
    pub engine: Arc<FakeEngine>,
    pub service: CvService,
}

pub fn harness(store: MockStore, mode: EngineMode, production: bool) -> Harness {
    harness_with(store, mode, production, Duration::from_secs(2), Duration::from_secs(2))
}

pub fn harness_with(
    store: MockStore,
    mode: EngineMode,
    production: bool,
    fetch_timeout: Duration,
    render_timeout: Duration,
) -> Harness {
    let store = Arc::new(store);
    let engine = FakeEngine::new(mode);
    let service = CvService::new(
        Arc::new(StyleRegistry::new().unwrap()),
        Aggregator::with_limits(data_source(&store), 4, fetch_timeout),
        Arc::new(PdfRenderer::new(engine.clone(), render_timeout)),
        Arc::new(WordRenderer::new()),
        production,
    );
    Harness {
        store,
        engine,
        service,
    }
}

// ========== 测试数据 ==========

pub fn asha() -> Person {
    let mut personal = PersonalRecord::new("Asha Rao");
    personal.designation = Some("Professor & Head".into());
    personal.department = Some("Computer Science".into());
    personal.institution = Some("Deccan University".into());
    personal.email = Some("asha@example.edu".into());
    personal.profile_image = Some("https://img.example.edu/asha.png".into());

    let mut sections = HashMap::new();
    sections.insert(
        SectionKey::Education,
        vec![
            CategoryRecord::new("PhD, Computer Science")
                .with_institution("IISc Bangalore")
                .with_date("2012"),
            CategoryRecord::new("M.Tech")
                .with_institution("IIT Madras")
                .with_date("2007"),
        ],
    );
    sections.insert(
        SectionKey::Books,
        vec![CategoryRecord::new("Practical <Compilers>")
            .with_institution("Springer")
            .with_date("2020")
            .with_detail("isbn", "978-3-16-148410-0")
            .with_document("https://files.example.edu/books/1.pdf")],
    );
    sections.insert(
        SectionKey::Papers,
        vec![CategoryRecord::new("Fast incremental parsing")
            .with_institution("PLDI")
            .with_date("2022")
            .with_detail("co_authors", "K. Iyer, M. Shah")],
    );
    sections.insert(
        SectionKey::FinancialSupport,
        vec![
            CategoryRecord::new("Conference travel")
                .with_institution("DST")
                .with_detail("amount", "50000")
                .with_date("2023"),
            CategoryRecord::new("Workshop grant").with_institution("UGC"),
        ],
    );
    sections.insert(
        SectionKey::Talks,
        vec![CategoryRecord::new("Parsing at scale").with_institution("FOSSASIA")],
    );

    Person {
        personal: Some(personal),
        sections,
    }
}

pub fn li_wei() -> Person {
    let mut personal = PersonalRecord::new("Li Wei");
    personal.designation = Some("Associate Professor".into());

    let mut sections = HashMap::new();
    sections.insert(
        SectionKey::Education,
        vec![CategoryRecord::new("PhD, Physics")
            .with_institution("Tsinghua University")
            .with_date("2015")],
    );
    sections.insert(
        SectionKey::Books,
        vec![CategoryRecord::new("Quantum Optics Notes").with_date("2019")],
    );

    Person {
        personal: Some(personal),
        sections,
    }
}

/// 只有分类记录、没有个人信息
pub fn anonymous() -> Person {
    let mut sections = HashMap::new();
    sections.insert(SectionKey::Education, vec![CategoryRecord::new("BSc")]);
    Person {
        personal: None,
        sections,
    }
}

pub fn fixture_store() -> MockStore {
    MockStore::new()
        .with_person(42, asha())
        .with_person(7, li_wei())
        .with_person(13, anonymous())
}

// ========== 输出解析 ==========

fn slot_by(f: impl Fn(StyleSlot) -> bool) -> Option<StyleSlot> {
    StyleSlot::ALL.into_iter().find(|&slot| f(slot))
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// HTML 中按出现顺序的（槽位, 文本）
pub fn html_texts(markup: &str) -> Vec<(StyleSlot, String)> {
    let re = Regex::new(r#"<(?:h1|h2|p|th|td) class="(cv-[a-z-]+)">([^<]*)</"#).unwrap();
    re.captures_iter(markup)
        .filter_map(|c| {
            let slot = slot_by(|s| s.css_class() == &c[1])?;
            Some((slot, unescape(&c[2])))
        })
        .collect()
}

/// DOCX 中按出现顺序的（槽位, 文本）
pub fn docx_texts(bytes: &[u8]) -> Vec<(StyleSlot, String)> {
    let document = docx_part(bytes, "word/document.xml");
    let re = Regex::new(r#"<w:pStyle w:val="(Cv[A-Za-z]+)"/>.*?<w:t xml:space="preserve">([^<]*)</w:t>"#)
        .unwrap();
    re.captures_iter(&document)
        .filter_map(|c| {
            let slot = slot_by(|s| s.word_style_id() == &c[1])?;
            Some((slot, unescape(&c[2])))
        })
        .collect()
}

pub fn docx_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut content = String::new();
    part.read_to_string(&mut content).unwrap();
    content
}

/// 只取分类标题
pub fn section_titles(texts: &[(StyleSlot, String)]) -> Vec<String> {
    texts
        .iter()
        .filter(|(slot, _)| *slot == StyleSlot::SectionTitle)
        .map(|(_, text)| text.clone())
        .collect()
}

/// PDF 替身把 HTML 原样附在文件头之后
pub fn markup_in_pdf(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&bytes[b"%PDF-1.7\n".len()..]).into_owned()
}

// ========== 日志捕获 ==========

/// 把当前线程的 tracing 输出收集到内存
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// 安装为当前线程的默认订阅者；guard 存活期间有效
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn warn_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(" WARN "))
            .map(str::to_string)
            .collect()
    }
}
