use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::errors::ParseError;
use crate::common::models::Platform;

pub const QUARK_HOSTS: &[&str] = &["pan.quark.cn", "pan-quark.cn"];
pub const ALIYUN_HOSTS: &[&str] = &["aliyundrive.com", "alipan.com"];
pub const BAIDU_HOSTS: &[&str] = &["pan.baidu.com", "yun.baidu.com"];

lazy_static! {
    // 分享 id 位于 /s/<id>，id 可以为空以便区分 "格式错误"
    static ref SHARE_ID_PATTERN: Regex = Regex::new(r"/s/([^/?#]*)").unwrap();
}

/// 不区分大小写地判断链接是否包含任一域名
pub fn matches_host(url: &str, hosts: &[&str]) -> bool {
    let url = url.to_ascii_lowercase();
    hosts.iter().any(|host| url.contains(host))
}

/// 只按域名判断平台，不做其他校验
pub fn platform_for_host(url: &str) -> Option<Platform> {
    [
        (Platform::Quark, QUARK_HOSTS),
        (Platform::Aliyun, ALIYUN_HOSTS),
        (Platform::Baidu, BAIDU_HOSTS),
    ]
    .into_iter()
    .find(|(_, hosts)| matches_host(url, hosts))
    .map(|(platform, _)| platform)
}

/// 检查是否为带域名的 http(s) 链接，返回去掉首尾空白的原始字符串
pub fn check_url(input: &str) -> Result<String, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::InvalidUrl("链接为空".to_string()));
    }

    let url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ParseError::InvalidUrl(format!(
            "不支持的协议: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ParseError::InvalidUrl("缺少域名".to_string()));
    }

    Ok(trimmed.to_string())
}

/// 从 `/s/<id>` 中提取分享 id
pub fn extract_share_id(url: &str) -> Result<String, ParseError> {
    let caps = SHARE_ID_PATTERN
        .captures(url)
        .ok_or_else(|| ParseError::MalformedShareLink("链接中没有 /s/<id>".to_string()))?;

    let id = &caps[1];
    if id.is_empty() {
        return Err(ParseError::MalformedShareLink("分享 id 为空".to_string()));
    }
    Ok(id.to_string())
}

/// 读取查询参数中的提取码（如 `?pwd=abcd`）
pub fn query_password(url: &str) -> Option<String> {
    let url = Url::parse(url.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "pwd")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
