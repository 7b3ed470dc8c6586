//! 内容分类（SectionKey）
//!
//! 枚举声明顺序即规范顺序（CanonicalOrder），`Ord` 由此派生，
//! 任何按 `SectionKey` 排序的集合都自动按规范顺序遍历。

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 内容分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    /// 教育背景
    Education,
    /// 工作经历
    Experience,
    /// 科研项目
    ResearchProjects,
    /// 论文
    Papers,
    /// 著作
    Books,
    /// 文章
    Articles,
    /// 专利
    Patents,
    /// 版权
    Copyrights,
    /// 咨询服务
    Consultancy,
    /// 合作交流
    Collaborations,
    /// 研究生指导
    Guidance,
    /// 学术报告
    Talks,
    /// 委员会任职
    Committees,
    /// 绩效
    Performance,
    /// 奖励荣誉
    Awards,
    /// 社会服务
    ExtensionActivities,
    /// 进修培训
    OrientationCourses,
    /// 数字化教学资源
    EContent,
    /// 经费资助
    FinancialSupport,
    /// 访学
    Visits,
    /// 政策文件
    PolicyDocuments,
}

/// 请求字符串 → 分类，含常见驼峰写法
static SECTION_NAMES: phf::Map<&'static str, SectionKey> = phf_map! {
    "education" => SectionKey::Education,
    "experience" => SectionKey::Experience,
    "research_projects" => SectionKey::ResearchProjects,
    "researchProjects" => SectionKey::ResearchProjects,
    "papers" => SectionKey::Papers,
    "books" => SectionKey::Books,
    "articles" => SectionKey::Articles,
    "patents" => SectionKey::Patents,
    "copyrights" => SectionKey::Copyrights,
    "consultancy" => SectionKey::Consultancy,
    "collaborations" => SectionKey::Collaborations,
    "guidance" => SectionKey::Guidance,
    "talks" => SectionKey::Talks,
    "committees" => SectionKey::Committees,
    "performance" => SectionKey::Performance,
    "awards" => SectionKey::Awards,
    "extension_activities" => SectionKey::ExtensionActivities,
    "extensionActivities" => SectionKey::ExtensionActivities,
    "orientation_courses" => SectionKey::OrientationCourses,
    "orientationCourses" => SectionKey::OrientationCourses,
    "e_content" => SectionKey::EContent,
    "eContent" => SectionKey::EContent,
    "financial_support" => SectionKey::FinancialSupport,
    "financialSupport" => SectionKey::FinancialSupport,
    "visits" => SectionKey::Visits,
    "policy_documents" => SectionKey::PolicyDocuments,
    "policyDocuments" => SectionKey::PolicyDocuments,
};

/// 版式：列表或表格，按分类固定，调用方不可配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLayout {
    Items,
    Table(&'static [Column]),
}

/// 表格列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub source: ColumnSource,
}

/// 表格单元格的取值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Title,
    Institution,
    Date,
    Detail(&'static str),
}

const fn col(header: &'static str, source: ColumnSource) -> Column {
    Column { header, source }
}

const RESEARCH_PROJECT_COLUMNS: &[Column] = &[
    col("Project", ColumnSource::Title),
    col("Funding Agency", ColumnSource::Institution),
    col("Amount", ColumnSource::Detail("amount")),
    col("Status", ColumnSource::Detail("status")),
    col("Period", ColumnSource::Date),
];

const CONSULTANCY_COLUMNS: &[Column] = &[
    col("Assignment", ColumnSource::Title),
    col("Client", ColumnSource::Institution),
    col("Amount", ColumnSource::Detail("amount")),
    col("Date", ColumnSource::Date),
];

const GUIDANCE_COLUMNS: &[Column] = &[
    col("Scholar", ColumnSource::Title),
    col("Degree", ColumnSource::Detail("degree")),
    col("Institution", ColumnSource::Institution),
    col("Status", ColumnSource::Detail("status")),
    col("Year", ColumnSource::Date),
];

const FINANCIAL_SUPPORT_COLUMNS: &[Column] = &[
    col("Purpose", ColumnSource::Title),
    col("Agency", ColumnSource::Institution),
    col("Amount", ColumnSource::Detail("amount")),
    col("Date", ColumnSource::Date),
];

impl SectionKey {
    /// 全部分类，按规范顺序
    pub const CANONICAL_ORDER: [SectionKey; 21] = [
        SectionKey::Education,
        SectionKey::Experience,
        SectionKey::ResearchProjects,
        SectionKey::Papers,
        SectionKey::Books,
        SectionKey::Articles,
        SectionKey::Patents,
        SectionKey::Copyrights,
        SectionKey::Consultancy,
        SectionKey::Collaborations,
        SectionKey::Guidance,
        SectionKey::Talks,
        SectionKey::Committees,
        SectionKey::Performance,
        SectionKey::Awards,
        SectionKey::ExtensionActivities,
        SectionKey::OrientationCourses,
        SectionKey::EContent,
        SectionKey::FinancialSupport,
        SectionKey::Visits,
        SectionKey::PolicyDocuments,
    ];

    /// 解析请求中的分类名
    pub fn parse(name: &str) -> Option<Self> {
        SECTION_NAMES.get(name.trim()).copied()
    }

    /// 规范名称（存储层与预览输出使用）
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Education => "education",
            SectionKey::Experience => "experience",
            SectionKey::ResearchProjects => "research_projects",
            SectionKey::Papers => "papers",
            SectionKey::Books => "books",
            SectionKey::Articles => "articles",
            SectionKey::Patents => "patents",
            SectionKey::Copyrights => "copyrights",
            SectionKey::Consultancy => "consultancy",
            SectionKey::Collaborations => "collaborations",
            SectionKey::Guidance => "guidance",
            SectionKey::Talks => "talks",
            SectionKey::Committees => "committees",
            SectionKey::Performance => "performance",
            SectionKey::Awards => "awards",
            SectionKey::ExtensionActivities => "extension_activities",
            SectionKey::OrientationCourses => "orientation_courses",
            SectionKey::EContent => "e_content",
            SectionKey::FinancialSupport => "financial_support",
            SectionKey::Visits => "visits",
            SectionKey::PolicyDocuments => "policy_documents",
        }
    }

    /// 文档中显示的分类标题
    pub fn title(self) -> &'static str {
        match self {
            SectionKey::Education => "Education",
            SectionKey::Experience => "Professional Experience",
            SectionKey::ResearchProjects => "Research Projects",
            SectionKey::Papers => "Research Papers",
            SectionKey::Books => "Books and Chapters",
            SectionKey::Articles => "Articles",
            SectionKey::Patents => "Patents",
            SectionKey::Copyrights => "Copyrights",
            SectionKey::Consultancy => "Consultancy",
            SectionKey::Collaborations => "Collaborations",
            SectionKey::Guidance => "Research Guidance",
            SectionKey::Talks => "Invited Talks",
            SectionKey::Committees => "Committee Participation",
            SectionKey::Performance => "Performance Appraisal",
            SectionKey::Awards => "Awards and Honours",
            SectionKey::ExtensionActivities => "Extension Activities",
            SectionKey::OrientationCourses => "Orientation and Refresher Courses",
            SectionKey::EContent => "E-Content Development",
            SectionKey::FinancialSupport => "Financial Support",
            SectionKey::Visits => "Academic Visits",
            SectionKey::PolicyDocuments => "Policy Documents",
        }
    }

    /// 版式策略
    pub fn layout(self) -> SectionLayout {
        match self {
            SectionKey::ResearchProjects => SectionLayout::Table(RESEARCH_PROJECT_COLUMNS),
            SectionKey::Consultancy => SectionLayout::Table(CONSULTANCY_COLUMNS),
            SectionKey::Guidance => SectionLayout::Table(GUIDANCE_COLUMNS),
            SectionKey::FinancialSupport => SectionLayout::Table(FINANCIAL_SUPPORT_COLUMNS),
            _ => SectionLayout::Items,
        }
    }

    /// 出版物类分类使用 publication entry 样式
    pub fn is_publication(self) -> bool {
        matches!(
            self,
            SectionKey::Papers | SectionKey::Books | SectionKey::Articles
        )
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
