use async_trait::async_trait;

use super::{errors::ParseError, models::ShareLinkInfo};
use crate::common::models::Platform;

// 每个网盘一个解析器，只需要实现识别和解析两个能力
// 新增网盘时在 LinkResolver 里注册即可，分发逻辑不用改
#[async_trait]
pub trait Parser: Send + Sync {
    // 对应的网盘平台
    fn platform(&self) -> Platform;

    // 纯字符串匹配，不能访问网络
    fn validate(&self, url: &str) -> bool;

    // 可以访问网络补充标题等信息
    async fn parse(&self, url: &str, password: Option<&str>) -> Result<ShareLinkInfo, ParseError>;
}
