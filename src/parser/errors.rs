use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("无效的URL: {0}")]
    InvalidUrl(String),
    #[error("不支持的网盘链接")]
    UnsupportedProvider,
    #[error("分享链接格式错误: {0}")]
    MalformedShareLink(String),
    #[error("提取码错误")]
    WrongPassword,
    #[error("解析失败: {0}")]
    Resolution(String),
}

impl ParseError {
    /// 给调用方区分提示用的稳定标识
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::UnsupportedProvider => "unsupported_provider",
            Self::MalformedShareLink(_) => "malformed_share_link",
            Self::WrongPassword => "wrong_password",
            Self::Resolution(_) => "resolution_failed",
        }
    }
}

impl From<reqwest::Error> for ParseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ParseError::Resolution("请求超时".to_string())
        } else {
            ParseError::Resolution(err.to_string())
        }
    }
}

impl From<url::ParseError> for ParseError {
    fn from(err: url::ParseError) -> Self {
        ParseError::InvalidUrl(err.to_string())
    }
}
