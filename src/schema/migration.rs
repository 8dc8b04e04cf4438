use std::collections::HashSet;

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::{EntitySchema, TableSchema};
use crate::store::errors::{Result, StoreError};

/// 一次迁移实际做了哪些改动
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub created_tables: Vec<String>,
    pub added_columns: Vec<(String, String)>, // (表名, 列名)
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.created_tables.is_empty() && self.added_columns.is_empty()
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 读取表当前的列名（统一转为小写，SQLite 列名不区分大小写）
pub fn live_columns(conn: &Connection, table: &str) -> Result<HashSet<String>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(columns.into_iter().map(|c| c.to_ascii_lowercase()).collect())
}

/// 将存储结构与声明的结构对齐
///
/// 只做加法：缺表则建表，缺列则补列；存储中多出来的列保持不动。
/// 对已经对齐的库重复调用不会产生任何改动。任何一步失败都直接返回错误，
/// 调用方应当终止启动。
pub fn reconcile(conn: &Connection, schema: &EntitySchema) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    for table in &schema.tables {
        let existing = live_columns(conn, &table.name)?;

        if existing.is_empty() {
            create_table(conn, table)?;
            report.created_tables.push(table.name.clone());
            continue;
        }

        for (column, spec) in &table.fields {
            if existing.contains(&column.to_ascii_lowercase()) {
                continue;
            }

            info!("正在向 {} 表添加 {} 字段...", table.name, column);
            let sql = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                quote_ident(&table.name),
                quote_ident(column),
                spec.add_column_definition()
            );
            debug!("执行: {}", sql);

            conn.execute(&sql, []).map_err(|source| {
                error!("数据库迁移失败: {}.{}: {}", table.name, column, source);
                StoreError::Migration {
                    table: table.name.clone(),
                    column: column.clone(),
                    source,
                }
            })?;

            info!("成功添加 {} 字段", column);
            report
                .added_columns
                .push((table.name.clone(), column.clone()));
        }
    }

    if report.is_empty() {
        debug!("数据库结构已是最新");
    } else {
        info!(
            "数据库迁移完成: 新建 {} 张表, 新增 {} 个字段",
            report.created_tables.len(),
            report.added_columns.len()
        );
    }

    Ok(report)
}

fn create_table(conn: &Connection, table: &TableSchema) -> Result<()> {
    let columns = table
        .fields
        .iter()
        .map(|(name, spec)| format!("{} {}", quote_ident(name), spec.create_column_definition()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&table.name),
        columns
    );

    info!("创建数据表: {}", table.name);
    debug!("执行: {}", sql);

    conn.execute(&sql, []).map_err(|source| StoreError::Migration {
        table: table.name.clone(),
        column: "*".to_string(),
        source,
    })?;
    Ok(())
}
