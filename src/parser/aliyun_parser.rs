use async_trait::async_trait;

use super::{
    detector::{ALIYUN_HOSTS, matches_host},
    errors::ParseError,
    models::{ShareLinkInfo, normalize_password},
    parser_trait::Parser,
};
use crate::common::models::Platform;

pub struct AliyunParser;

#[async_trait]
impl Parser for AliyunParser {
    fn platform(&self) -> Platform {
        Platform::Aliyun
    }

    fn validate(&self, url: &str) -> bool {
        matches_host(url, ALIYUN_HOSTS)
    }

    // 阿里云盘暂不做远程解析
    async fn parse(&self, url: &str, password: Option<&str>) -> Result<ShareLinkInfo, ParseError> {
        Ok(ShareLinkInfo::new(url.trim()).with_password(normalize_password(password)))
    }
}
