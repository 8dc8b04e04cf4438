use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    Database,
    errors::{Result, StoreError},
};
use crate::common::models::{Course, Platform};
use crate::parser::detector::platform_for_host;

const ENTITY: &str = "course";

const SELECT_COLUMNS: &str = "id, title, category, imageUrl, shareLink, platform, password, \
     teacher, createdAt, totalEpisodes, watchedEpisodes";

pub struct CourseRepo<'a> {
    db: &'a Database,
}

impl<'a> CourseRepo<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// 获取所有课程，顺序由存储决定
    pub fn list(&self) -> Result<Vec<Course>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM courses ORDER BY rowid",
            SELECT_COLUMNS
        ))?;
        let courses = stmt
            .query_map([], course_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }

    /// 按分类浏览
    pub fn list_by_category(&self, category_id: &str) -> Result<Vec<Course>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM courses WHERE category = ?1 ORDER BY rowid",
            SELECT_COLUMNS
        ))?;
        let courses = stmt
            .query_map([category_id], course_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }

    pub fn get(&self, id: &str) -> Result<Course> {
        let conn = self.db.lock()?;
        find(&conn, id)?.ok_or_else(|| not_found(id))
    }

    /// 添加课程
    ///
    /// `id` 为空时生成 UUID，`createdAt` 为空时写入当前时间，
    /// 未提供的已看集数为 0。
    pub fn create(&self, mut course: Course) -> Result<Course> {
        validate_input(&course)?;

        if course.id.trim().is_empty() {
            course.id = Uuid::new_v4().to_string();
        }
        if course.created_at.trim().is_empty() {
            course.created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        }

        let conn = self.db.lock()?;
        if find(&conn, &course.id)?.is_some() {
            return Err(StoreError::DuplicateKey {
                entity: ENTITY,
                id: course.id,
            });
        }
        warn_unknown_category(&conn, &course.category)?;

        conn.execute(
            "INSERT INTO courses (id, title, category, imageUrl, shareLink, platform, password, \
             teacher, createdAt, totalEpisodes, watchedEpisodes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                course.id,
                course.title,
                course.category,
                course.image_url,
                course.share_link,
                course.platform.map(|p| p.as_str()),
                course.password,
                course.teacher,
                course.created_at,
                course.total_episodes,
                course.watched_episodes,
            ],
        )?;

        info!("添加课程: {} ({})", course.title, course.id);
        Ok(course)
    }

    /// 整体替换课程内容，`id` 与 `createdAt` 保持不变
    pub fn update(&self, id: &str, course: Course) -> Result<Course> {
        validate_input(&course)?;

        let conn = self.db.lock()?;
        warn_unknown_category(&conn, &course.category)?;

        let changed = conn.execute(
            "UPDATE courses SET title = ?1, category = ?2, imageUrl = ?3, shareLink = ?4, \
             platform = ?5, password = ?6, teacher = ?7, totalEpisodes = ?8, \
             watchedEpisodes = ?9 WHERE id = ?10",
            params![
                course.title,
                course.category,
                course.image_url,
                course.share_link,
                course.platform.map(|p| p.as_str()),
                course.password,
                course.teacher,
                course.total_episodes,
                course.watched_episodes,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        info!("更新课程: {}", id);
        find(&conn, id)?.ok_or_else(|| not_found(id))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.db.lock()?;
        let changed = conn.execute("DELETE FROM courses WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        info!("删除课程: {}", id);
        Ok(())
    }

    /// 已看集数加一，已到总集数（或 u32 上限）时保持不变
    pub fn advance_progress(&self, id: &str) -> Result<Course> {
        let conn = self.db.lock()?;
        let changed = conn.execute(
            "UPDATE courses SET watchedEpisodes = watchedEpisodes + 1 \
             WHERE id = ?1 AND watchedEpisodes < ?2 \
             AND (totalEpisodes IS NULL OR watchedEpisodes < totalEpisodes)",
            params![id, u32::MAX],
        )?;
        let course = find(&conn, id)?.ok_or_else(|| not_found(id))?;
        if changed == 0 {
            debug!("课程 {} 已看完，进度不变", id);
        }
        Ok(course)
    }

    /// 直接设置已看集数
    pub fn set_progress(&self, id: &str, watched: u32) -> Result<Course> {
        let conn = self.db.lock()?;
        let mut course = find(&conn, id)?.ok_or_else(|| not_found(id))?;
        course.watched_episodes = watched;
        validate(&course)?;

        conn.execute(
            "UPDATE courses SET watchedEpisodes = ?1 WHERE id = ?2",
            params![watched, id],
        )?;
        Ok(course)
    }
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    }
}

fn find(conn: &Connection, id: &str) -> Result<Option<Course>> {
    let course = conn
        .query_row(
            &format!("SELECT {} FROM courses WHERE id = ?1", SELECT_COLUMNS),
            [id],
            course_from_row,
        )
        .optional()?;
    Ok(course)
}

// 分类只是建议性引用，找不到时只记录警告
fn warn_unknown_category(conn: &Connection, category: &str) -> Result<()> {
    let known = conn
        .query_row("SELECT 1 FROM categories WHERE id = ?1", [category], |_| {
            Ok(())
        })
        .optional()?;
    if known.is_none() {
        warn!("课程引用了不存在的分类: {}", category);
    }
    Ok(())
}

// 新写入的课程必须带平台
fn validate_input(course: &Course) -> Result<()> {
    validate(course)?;
    if course.platform.is_none() {
        return Err(StoreError::Validation("缺少必填字段: platform".to_string()));
    }
    Ok(())
}

fn validate(course: &Course) -> Result<()> {
    let required = [
        ("title", &course.title),
        ("category", &course.category),
        ("imageUrl", &course.image_url),
        ("shareLink", &course.share_link),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(StoreError::Validation(format!("缺少必填字段: {}", field)));
        }
    }

    if let Some(total) = course.total_episodes {
        if total == 0 {
            return Err(StoreError::Validation("总集数必须大于 0".to_string()));
        }
        if course.watched_episodes > total {
            return Err(StoreError::Validation(format!(
                "已看集数 {} 超过总集数 {}",
                course.watched_episodes, total
            )));
        }
    }
    Ok(())
}

// 迁移补出的 platform 列为空串，按分享链接域名推断
fn read_platform(id: &str, stored: &str, share_link: &str) -> Option<Platform> {
    if let Ok(platform) = stored.parse::<Platform>() {
        return Some(platform);
    }
    let detected = platform_for_host(share_link);
    warn!(
        "课程 {} 的平台 {:?} 无法识别，按链接推断为 {:?}",
        id, stored, detected
    );
    detected
}

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    let id: String = row.get(0)?;
    let share_link: String = row.get(4)?;
    let stored: Option<String> = row.get(5)?;
    let platform = read_platform(&id, stored.as_deref().unwrap_or_default(), &share_link);

    Ok(Course {
        id,
        title: row.get(1)?,
        category: row.get(2)?,
        image_url: row.get(3)?,
        share_link,
        platform,
        password: row.get(6)?,
        teacher: row.get(7)?,
        created_at: row.get(8)?,
        total_episodes: row.get(9)?,
        watched_episodes: row.get(10)?,
    })
}
