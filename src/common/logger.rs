use colored::*;

use crate::common::models::{Category, Course};
use crate::parser::models::ShareLinkInfo;

/// 命令行输出工具
pub struct PrettyLogger;

impl PrettyLogger {
    /// 显示成功消息
    pub fn success(message: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), message.as_ref());
    }

    /// 显示信息消息
    pub fn info(message: impl AsRef<str>) {
        println!("{} {}", "ℹ".blue().bold(), message.as_ref());
    }

    /// 显示警告消息
    pub fn warning(message: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow().bold(), message.as_ref());
    }

    /// 显示错误消息
    pub fn error(message: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), message.as_ref());
    }

    /// 显示分割线
    pub fn separator() {
        println!("{}", "─".repeat(50).bright_black());
    }

    /// 显示标题
    pub fn title(text: impl AsRef<str>) {
        let text = text.as_ref();
        let width = text.chars().count().min(48);
        let padding = (48 - width) / 2;
        println!(
            "{} {} {}",
            "─".repeat(padding).bright_black(),
            text.bold(),
            "─".repeat(48 - padding - width).bright_black()
        );
    }

    /// 显示一门课程
    pub fn course(course: &Course) {
        let progress = match course.total_episodes {
            Some(total) => format!("{}/{}", course.watched_episodes, total),
            None => format!("{}/?", course.watched_episodes),
        };
        let progress = if course.is_finished() {
            progress.green()
        } else {
            progress.cyan()
        };
        println!(
            "{} {} [{}] {} {}",
            "🎬".magenta().bold(),
            course.title.bold(),
            course.platform.map_or("未知平台", |p| p.label()),
            progress,
            course.id.bright_black()
        );
        if let Some(teacher) = &course.teacher {
            println!("   {}", teacher);
        }
        println!("   {}", course.share_link.underline());
    }

    /// 显示一个分类
    pub fn category(category: &Category) {
        println!(
            "{} {} ({}) {}",
            "📁".blue().bold(),
            category.name.bold(),
            category.icon,
            category.id.bright_black()
        );
    }

    /// 显示分享链接解析结果
    pub fn share_info(info: &ShareLinkInfo) {
        println!("{} {}", "🔗".blue().bold(), info.valid_url);
        if let Some(title) = &info.title {
            println!("   标题: {}", title.bold());
        }
        if let Some(password) = &info.password {
            println!("   提取码: {}", password.cyan());
        }
    }
}

/// 便捷宏用于漂亮的日志输出
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::success(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::warning(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::error(format!($($arg)*))
    };
}
