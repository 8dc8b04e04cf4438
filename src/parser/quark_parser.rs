use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{
    detector::{QUARK_HOSTS, extract_share_id, matches_host},
    errors::ParseError,
    models::{ShareLinkInfo, normalize_password},
    parser_trait::Parser,
    quark_client::ShareResolver,
};
use crate::common::models::Platform;

#[derive(Default)]
pub struct QuarkParser {
    resolver: Option<Arc<dyn ShareResolver>>,
}

impl QuarkParser {
    // 不访问网络，只校验并规范化链接
    pub fn new() -> Self {
        Self { resolver: None }
    }

    pub fn with_resolver(resolver: Arc<dyn ShareResolver>) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }
}

#[async_trait]
impl Parser for QuarkParser {
    fn platform(&self) -> Platform {
        Platform::Quark
    }

    fn validate(&self, url: &str) -> bool {
        matches_host(url, QUARK_HOSTS)
    }

    async fn parse(&self, url: &str, password: Option<&str>) -> Result<ShareLinkInfo, ParseError> {
        let valid_url = url.trim();
        let share_id = extract_share_id(valid_url)?;
        let password = normalize_password(password);

        let title = match &self.resolver {
            Some(resolver) => {
                debug!("解析夸克分享: {}", share_id);
                resolver.fetch_title(&share_id, password.as_deref()).await?
            }
            None => None,
        };

        Ok(ShareLinkInfo::new(valid_url)
            .with_title(title)
            .with_password(password))
    }
}
