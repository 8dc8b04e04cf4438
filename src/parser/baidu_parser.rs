use async_trait::async_trait;

use super::{
    detector::{BAIDU_HOSTS, matches_host, query_password},
    errors::ParseError,
    models::{ShareLinkInfo, normalize_password},
    parser_trait::Parser,
};
use crate::common::models::Platform;

pub struct BaiduParser;

#[async_trait]
impl Parser for BaiduParser {
    fn platform(&self) -> Platform {
        Platform::Baidu
    }

    fn validate(&self, url: &str) -> bool {
        matches_host(url, BAIDU_HOSTS)
    }

    async fn parse(&self, url: &str, password: Option<&str>) -> Result<ShareLinkInfo, ParseError> {
        let valid_url = url.trim();
        // 百度的分享链接常把提取码带在 ?pwd= 里
        let password = normalize_password(password).or_else(|| query_password(valid_url));
        Ok(ShareLinkInfo::new(valid_url).with_password(password))
    }
}
