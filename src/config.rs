use std::path::PathBuf;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 单次请求内同时抓取的分类数量
    pub max_concurrent_fetches: usize,
    /// 单个分类抓取超时（秒）
    pub fetch_timeout_secs: u64,
    /// 单次渲染超时（秒）
    pub render_timeout_secs: u64,
    /// 同时存活的浏览器进程数量
    pub max_concurrent_renders: usize,
    /// 浏览器可执行文件路径，未设置时由 chromiumoxide 自动查找
    pub chrome_executable: Option<PathBuf>,
    // --- 存储配置 ---
    /// HTTP 记录存储地址；未设置时使用本地 TOML 目录
    pub record_store_url: Option<String>,
    pub record_store_dir: PathBuf,
    /// HTTP 连接池空闲连接上限
    pub store_pool_size: usize,
    // --- 批处理配置 ---
    pub request_file: PathBuf,
    pub output_dir: PathBuf,
    pub max_concurrent_requests: usize,
    /// 生产环境下 500 响应不带错误详情
    pub production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 5,
            fetch_timeout_secs: 10,
            render_timeout_secs: 30,
            max_concurrent_renders: 2,
            chrome_executable: None,
            record_store_url: None,
            record_store_dir: PathBuf::from("records"),
            store_pool_size: 10,
            request_file: PathBuf::from("requests.json"),
            output_dir: PathBuf::from("output"),
            max_concurrent_requests: 4,
            production: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_fetches: env_parse("MAX_CONCURRENT_FETCHES").unwrap_or(default.max_concurrent_fetches).max(1),
            fetch_timeout_secs: env_parse("FETCH_TIMEOUT_SECS").unwrap_or(default.fetch_timeout_secs),
            render_timeout_secs: env_parse("RENDER_TIMEOUT_SECS").unwrap_or(default.render_timeout_secs),
            max_concurrent_renders: env_parse("MAX_CONCURRENT_RENDERS").unwrap_or(default.max_concurrent_renders).max(1),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(default.chrome_executable),
            record_store_url: std::env::var("RECORD_STORE_URL").ok().filter(|v| !v.trim().is_empty()).or(default.record_store_url),
            record_store_dir: std::env::var("RECORD_STORE_DIR").map(PathBuf::from).unwrap_or(default.record_store_dir),
            store_pool_size: env_parse("STORE_POOL_SIZE").unwrap_or(default.store_pool_size).max(1),
            request_file: std::env::var("REQUEST_FILE").map(PathBuf::from).unwrap_or(default.request_file),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            max_concurrent_requests: env_parse("MAX_CONCURRENT_REQUESTS").unwrap_or(default.max_concurrent_requests).max(1),
            production: env_parse("PRODUCTION").unwrap_or(default.production),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
