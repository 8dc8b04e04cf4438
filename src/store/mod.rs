//! 课程与分类的存储层
//!
//! `Database::open` 先执行结构迁移，迁移成功后才返回句柄，
//! 所以拿到 `Database` 就意味着表结构已经对齐。

pub mod category;
pub mod course;
pub mod errors;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::info;

use crate::schema::{
    EntitySchema, catalog_schema,
    migration::{self, MigrationReport},
};
pub use category::CategoryRepo;
pub use course::CourseRepo;
use errors::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    schema: &'static EntitySchema,
}

impl Database {
    /// 打开（或创建）数据库文件，并按课程库结构完成迁移
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, MigrationReport)> {
        let path = path.as_ref();
        info!("打开数据库: {:?}", path);
        let conn = Connection::open(path)?;
        Self::with_connection(conn, catalog_schema())
    }

    /// 内存数据库，主要给测试和一次性命令使用
    pub fn open_in_memory() -> Result<(Self, MigrationReport)> {
        Self::with_connection(Connection::open_in_memory()?, catalog_schema())
    }

    /// 用指定的结构迁移已有连接
    pub fn with_connection(
        conn: Connection,
        schema: &'static EntitySchema,
    ) -> Result<(Self, MigrationReport)> {
        let report = migration::reconcile(&conn, schema)?;
        Ok((
            Self {
                conn: Arc::new(Mutex::new(conn)),
                schema,
            },
            report,
        ))
    }

    /// 再次执行迁移（幂等）
    pub fn reconcile(&self) -> Result<MigrationReport> {
        let conn = self.lock()?;
        migration::reconcile(&conn, self.schema)
    }

    pub fn courses(&self) -> CourseRepo<'_> {
        CourseRepo::new(self)
    }

    pub fn categories(&self) -> CategoryRepo<'_> {
        CategoryRepo::new(self)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockError)
    }
}
