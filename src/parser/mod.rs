use std::sync::Arc;

use errors::ParseError;
use models::ShareLinkInfo;
use parser_trait::Parser;
use quark_client::{QuarkClient, ShareResolver};
use tracing::debug;

use crate::common::{config::ResolverConfig, models::Platform};

pub mod detector;
pub mod errors;
pub mod models;
pub mod parser_trait;
pub mod quark_client;
pub mod quark_parser;
use quark_parser::QuarkParser;
pub mod aliyun_parser;
use aliyun_parser::AliyunParser;
pub mod baidu_parser;
use baidu_parser::BaiduParser;

/// 分享链接解析入口
///
/// 按注册顺序（夸克、阿里、百度）挑选第一个能识别链接的解析器。
pub struct LinkResolver {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkResolver {
    /// 不做远程解析的默认注册表
    pub fn new() -> Self {
        Self::with_quark(QuarkParser::new())
    }

    /// 夸克链接通过给定的远程解析器补充标题
    pub fn with_resolver(resolver: Arc<dyn ShareResolver>) -> Self {
        Self::with_quark(QuarkParser::with_resolver(resolver))
    }

    /// 按配置创建，`resolve_remote` 关闭时不访问网络
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ParseError> {
        if !config.resolve_remote {
            return Ok(Self::new());
        }
        let client = QuarkClient::new(config)?;
        Ok(Self::with_resolver(Arc::new(client)))
    }

    fn with_quark(quark: QuarkParser) -> Self {
        Self {
            parsers: vec![Box::new(quark), Box::new(AliyunParser), Box::new(BaiduParser)],
        }
    }

    /// 空注册表，用于自定义解析器组合
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// 追加一个解析器，优先级低于已注册的
    pub fn register(&mut self, parser: Box<dyn Parser>) {
        self.parsers.push(parser);
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.parsers.iter().map(|p| p.platform()).collect()
    }

    fn select(&self, url: &str) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .find(|p| p.validate(url))
            .map(|p| p.as_ref())
    }

    /// 只根据域名判断平台，不访问网络
    pub fn detect_platform(&self, url: &str) -> Option<Platform> {
        self.select(url.trim()).map(|p| p.platform())
    }

    // 解析入口
    pub async fn resolve(
        &self,
        raw_url: &str,
        password: Option<&str>,
    ) -> Result<ShareLinkInfo, ParseError> {
        let url = detector::check_url(raw_url)?;

        let parser = self.select(&url).ok_or(ParseError::UnsupportedProvider)?;
        debug!("检测到网盘平台：{}", parser.platform());

        parser.parse(&url, password).await
    }
}
