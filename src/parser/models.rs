use serde::{Deserialize, Serialize};

/// 解析后的分享链接信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkInfo {
    pub valid_url: String, // 去掉首尾空白后的链接
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>, // 远程解析得到的标题
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ShareLinkInfo {
    pub fn new(valid_url: impl Into<String>) -> Self {
        Self {
            valid_url: valid_url.into(),
            title: None,
            password: None,
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}

/// 空白的提取码视为未提供
pub fn normalize_password(password: Option<&str>) -> Option<String> {
    password
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
