use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --------------------------------------------------------------------
// 网盘平台

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Quark,  // 夸克网盘
    Aliyun, // 阿里云盘
    Baidu,  // 百度网盘
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quark => "quark",
            Self::Aliyun => "aliyun",
            Self::Baidu => "baidu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Quark => "夸克网盘",
            Self::Aliyun => "阿里云盘",
            Self::Baidu => "百度网盘",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quark" => Ok(Self::Quark),
            "aliyun" => Ok(Self::Aliyun),
            "baidu" => Ok(Self::Baidu),
            other => Err(format!("未知的网盘平台: {}", other)),
        }
    }
}

// --------------------------------------------------------------------
// 分类图标

/// 分类可用的图标，渲染端与创建端共用同一组 key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryIcon {
    Code2,
    Palette,
    Briefcase,
    Languages,
    Award,
    BookOpen,
    GraduationCap,
    Brain,
    Lightbulb,
    Rocket,
    Database,
    Globe,
    Terminal,
}

impl CategoryIcon {
    pub const ALL: [CategoryIcon; 13] = [
        Self::Code2,
        Self::Palette,
        Self::Briefcase,
        Self::Languages,
        Self::Award,
        Self::BookOpen,
        Self::GraduationCap,
        Self::Brain,
        Self::Lightbulb,
        Self::Rocket,
        Self::Database,
        Self::Globe,
        Self::Terminal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Code2 => "code-2",
            Self::Palette => "palette",
            Self::Briefcase => "briefcase",
            Self::Languages => "languages",
            Self::Award => "award",
            Self::BookOpen => "book-open",
            Self::GraduationCap => "graduation-cap",
            Self::Brain => "brain",
            Self::Lightbulb => "lightbulb",
            Self::Rocket => "rocket",
            Self::Database => "database",
            Self::Globe => "globe",
            Self::Terminal => "terminal",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|icon| icon.key() == key)
    }
}

// --------------------------------------------------------------------
// 课程

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub id: String, // 为空时由存储层生成
    pub title: String,
    pub category: String, // 分类 id，不做外键约束
    pub image_url: String,
    pub share_link: String,
    // 早期数据可能缺少平台，读取时无法识别则为空
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default)]
    pub created_at: String, // RFC 3339，只在创建时写入
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub watched_episodes: u32,
}

impl Course {
    /// 是否已看完（未设置总集数时永远为 false）
    pub fn is_finished(&self) -> bool {
        matches!(self.total_episodes, Some(total) if self.watched_episodes >= total)
    }
}

// --------------------------------------------------------------------
// 分类

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub icon: String,
}
