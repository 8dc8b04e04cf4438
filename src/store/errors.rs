use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("数据校验失败: {0}")]
    Validation(String),

    #[error("无效的分类图标: {0}")]
    InvalidIcon(String),

    #[error("{entity} 不存在: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} 已存在: {id}")]
    DuplicateKey { entity: &'static str, id: String },

    #[error("分类名称已存在: {0}")]
    DuplicateName(String),

    #[error("数据库操作失败: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("数据库迁移失败 ({table}.{column}): {source}")]
    Migration {
        table: String,
        column: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("数据库锁定失败")]
    LockError,
}

impl StoreError {
    /// 给调用方（HTTP 层、CLI）使用的稳定错误标识
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidIcon(_) => "invalid_icon",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::DuplicateName(_) => "duplicate_name",
            Self::Storage(_) | Self::Migration { .. } | Self::LockError => "storage",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
