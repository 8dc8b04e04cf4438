use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;
use uuid::Uuid;

use super::{
    Database,
    errors::{Result, StoreError},
};
use crate::common::models::{Category, CategoryIcon};

const ENTITY: &str = "category";

pub struct CategoryRepo<'a> {
    db: &'a Database,
}

impl<'a> CategoryRepo<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, icon FROM categories ORDER BY rowid")?;
        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn get(&self, id: &str) -> Result<Category> {
        let conn = self.db.lock()?;
        find(&conn, id)?.ok_or_else(|| not_found(id))
    }

    /// 添加分类，名称不能与已有分类重复，图标必须在固定集合中
    pub fn create(&self, mut category: Category) -> Result<Category> {
        validate(&category)?;
        if category.id.trim().is_empty() {
            category.id = Uuid::new_v4().to_string();
        }

        let conn = self.db.lock()?;
        if find(&conn, &category.id)?.is_some() {
            return Err(StoreError::DuplicateKey {
                entity: ENTITY,
                id: category.id,
            });
        }
        ensure_unique_name(&conn, &category.name, &category.id)?;

        conn.execute(
            "INSERT INTO categories (id, name, icon) VALUES (?1, ?2, ?3)",
            params![category.id, category.name, category.icon],
        )?;

        info!("添加分类: {} ({})", category.name, category.id);
        Ok(category)
    }

    pub fn update(&self, id: &str, mut category: Category) -> Result<Category> {
        validate(&category)?;
        category.id = id.to_string();

        let conn = self.db.lock()?;
        if find(&conn, id)?.is_none() {
            return Err(not_found(id));
        }
        ensure_unique_name(&conn, &category.name, id)?;

        let changed = conn.execute(
            "UPDATE categories SET name = ?1, icon = ?2 WHERE id = ?3",
            params![category.name, category.icon, id],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        info!("更新分类: {}", id);
        Ok(category)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.db.lock()?;
        let changed = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        info!("删除分类: {}", id);
        Ok(())
    }
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    }
}

fn find(conn: &Connection, id: &str) -> Result<Option<Category>> {
    let category = conn
        .query_row(
            "SELECT id, name, icon FROM categories WHERE id = ?1",
            [id],
            category_from_row,
        )
        .optional()?;
    Ok(category)
}

// 名称区分大小写，与自身 id 相同的记录不算重复
fn ensure_unique_name(conn: &Connection, name: &str, own_id: &str) -> Result<()> {
    let taken = conn
        .query_row(
            "SELECT 1 FROM categories WHERE name = ?1 AND id <> ?2",
            params![name, own_id],
            |_| Ok(()),
        )
        .optional()?;
    match taken {
        Some(()) => Err(StoreError::DuplicateName(name.to_string())),
        None => Ok(()),
    }
}

fn validate(category: &Category) -> Result<()> {
    if category.name.trim().is_empty() {
        return Err(StoreError::Validation("分类名称不能为空".to_string()));
    }
    if CategoryIcon::from_key(&category.icon).is_none() {
        return Err(StoreError::InvalidIcon(category.icon.clone()));
    }
    Ok(())
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
    })
}
