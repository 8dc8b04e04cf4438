use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use pan_course::common::config::{
    AppConfig, DEFAULT_DB_PATH, DEFAULT_QUARK_API_BASE, DEFAULT_RESOLVE_TIMEOUT_SECS,
    DEFAULT_UPLOAD_DIR, MAX_UPLOAD_BYTES, ResolverConfig,
};

/// 网盘课程管理工具
#[derive(Parser, Debug)]
#[command(name = "pancourse")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "收藏网盘分享的课程，记录观看进度", long_about = None)]
pub struct Cli {
    /// 数据库文件
    #[arg(long, value_name = "FILE", global = true)]
    #[arg(env = "PAN_COURSE_DB", default_value = DEFAULT_DB_PATH)]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub db: PathBuf,

    /// 输出调试日志
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动 HTTP 服务
    Serve(ServeArgs),

    /// 只执行数据库迁移
    Migrate,

    /// 解析分享链接
    Resolve {
        /// 分享链接
        #[arg(value_hint = clap::ValueHint::Url)]
        url: String,

        /// 提取码
        #[arg(long)]
        password: Option<String>,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// 课程管理
    #[command(subcommand)]
    Courses(CourseCommand),

    /// 分类管理
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Subcommand, Debug)]
pub enum CourseCommand {
    /// 列出课程
    List {
        /// 只显示该分类下的课程
        #[arg(long, value_name = "CATEGORY_ID")]
        category: Option<String>,
    },
    /// 已看集数加一
    Watch { id: String },
    /// 删除课程
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// 列出分类
    List,
    /// 添加分类
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, help = "图标: code-2, palette, brain, ...")]
        icon: String,
    },
    /// 可用的图标
    Icons,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// 监听地址
    #[arg(long, env = "PAN_COURSE_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// 上传文件保存目录
    #[arg(long, value_name = "DIR", env = "PAN_COURSE_UPLOAD_DIR")]
    #[arg(default_value = DEFAULT_UPLOAD_DIR)]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub upload_dir: PathBuf,

    #[command(flatten)]
    pub resolver: ResolverArgs,
}

#[derive(Args, Debug)]
pub struct ResolverArgs {
    /// 通过网盘接口补充标题等信息
    #[arg(long)]
    pub remote: bool,

    /// 夸克接口地址
    #[arg(long, env = "PAN_COURSE_QUARK_API", default_value = DEFAULT_QUARK_API_BASE)]
    pub quark_api_base: String,

    /// 夸克会话 cookie
    #[arg(long, env = "PAN_COURSE_QUARK_COOKIE", hide_env_values = true)]
    pub quark_cookie: Option<String>,

    /// 远程解析超时（秒）
    #[arg(long, default_value_t = DEFAULT_RESOLVE_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl ResolverArgs {
    pub fn to_config(&self) -> ResolverConfig {
        ResolverConfig {
            resolve_remote: self.remote,
            quark_api_base: self.quark_api_base.clone(),
            quark_cookie: self.quark_cookie.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

impl Cli {
    pub fn app_config(&self, serve: &ServeArgs) -> AppConfig {
        AppConfig {
            db_path: self.db.clone(),
            upload_dir: serve.upload_dir.clone(),
            bind: serve.bind,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            resolver: serve.resolver.to_config(),
        }
    }
}
