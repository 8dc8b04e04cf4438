use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder, StatusCode,
    header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::errors::ParseError;
use crate::common::config::ResolverConfig;

const TOKEN_PATH: &str = "/1/clouddrive/share/sharepage/token?pr=ucpro&fr=pc";

// 夸克返回这些错误码时表示提取码不对或缺失
const WRONG_PASSCODE_CODES: &[i64] = &[41007, 41008];

// 远程解析能力，测试中可以替换成假的实现
#[async_trait]
pub trait ShareResolver: Send + Sync {
    // 根据分享 id 和提取码查询标题
    async fn fetch_title(
        &self,
        share_id: &str,
        passcode: Option<&str>,
    ) -> Result<Option<String>, ParseError>;
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    pwd_id: &'a str,
    passcode: &'a str,
}

// 调用夸克分享页 token 接口的客户端
#[derive(Debug, Clone)]
pub struct QuarkClient {
    inner: Client,
    api_base: String,
}

impl QuarkClient {
    pub fn new(config: &ResolverConfig) -> Result<Self, ParseError> {
        let mut headers = Self::get_default_headers();
        // 会话 cookie 由配置注入，过期后换配置即可
        if let Some(cookie) = &config.quark_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ParseError::Resolution(format!("无效的 cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        } else {
            warn!("未配置夸克 cookie，部分分享可能无法解析");
        }

        let inner = ClientBuilder::new()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                error!("创建 HTTP 客户端失败: {}", e);
                ParseError::Resolution(e.to_string())
            })?;

        Ok(Self {
            inner,
            api_base: config.quark_api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static("https://pan.quark.cn"));
        headers.insert(REFERER, HeaderValue::from_static("https://pan.quark.cn/"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36"));
        headers
    }

    /// 请求分享 token 接口，原样返回状态码和 JSON（代理接口直接转发给前端）
    pub async fn fetch_token_raw(
        &self,
        pwd_id: &str,
        passcode: Option<&str>,
    ) -> Result<(StatusCode, Value), ParseError> {
        let url = format!("{}{}", self.api_base, TOKEN_PATH);
        debug!("请求夸克分享信息: {} ({})", url, pwd_id);

        let resp = self
            .inner
            .post(&url)
            .json(&TokenRequest {
                pwd_id,
                passcode: passcode.unwrap_or_default(),
            })
            .send()
            .await
            .map_err(|e| {
                error!("请求失败: {}", e);
                ParseError::from(e)
            })?;

        let status = resp.status();
        let text = resp.text().await?;
        let body = serde_json::from_str::<Value>(&text).map_err(|e| {
            error!("响应不是 JSON ({}): {}", status, e);
            ParseError::Resolution(format!("响应解析失败: {}", e))
        })?;
        Ok((status, body))
    }
}

#[async_trait]
impl ShareResolver for QuarkClient {
    async fn fetch_title(
        &self,
        share_id: &str,
        passcode: Option<&str>,
    ) -> Result<Option<String>, ParseError> {
        // 错误码在 JSON 里，状态码只给代理接口用
        let (_, body) = self.fetch_token_raw(share_id, passcode).await?;
        interpret_token_response(&body)
    }
}

/// 解读夸克 token 接口的返回
///
/// `code == 0` 视为成功并读取 `data.title`；提取码相关的错误码或提示
/// 归为 `WrongPassword`，其余都是一般的解析失败。
pub fn interpret_token_response(body: &Value) -> Result<Option<String>, ParseError> {
    let code = body.get("code").and_then(Value::as_i64).unwrap_or(-1);
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");

    if code == 0 {
        let title = body
            .pointer("/data/title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        return Ok(title);
    }

    if WRONG_PASSCODE_CODES.contains(&code) || message.contains("提取码") {
        debug!("夸克返回提取码错误: {} {}", code, message);
        return Err(ParseError::WrongPassword);
    }

    Err(ParseError::Resolution(format!("夸克 API 错误 {}: {}", code, message)))
}
