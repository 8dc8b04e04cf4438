use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "./database.sqlite";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_QUARK_API_BASE: &str = "https://drive-h.quark.cn";
pub const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 5;
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024; // 5MB 限制

/// 远程解析相关配置
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub resolve_remote: bool,
    pub quark_api_base: String,
    /// 夸克会话 cookie，会过期，需要时替换
    pub quark_cookie: Option<String>,
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resolve_remote: false,
            quark_api_base: DEFAULT_QUARK_API_BASE.to_string(),
            quark_cookie: None,
            timeout: Duration::from_secs(DEFAULT_RESOLVE_TIMEOUT_SECS),
        }
    }
}

/// 服务运行配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
    pub resolver: ResolverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            resolver: ResolverConfig::default(),
        }
    }
}
