//! 客户端侧的记录缓存
//!
//! 缓存只在服务端确认成功后才变更（write-through）。服务端调用失败时缓存
//! 保持原样，错误原样返回给调用方。

use crate::common::models::{Category, Course};

/// 可以按 id 缓存的记录
pub trait Record: Clone {
    fn id(&self) -> &str;
}

impl Record for Course {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

/// 服务端已经确认的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    Created(T),
    Updated(String, T),
    Deleted(String),
}

#[derive(Debug, Clone)]
pub struct RecordCache<T> {
    items: Vec<T>,
}

impl<T: Record> Default for RecordCache<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> RecordCache<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// 把一条已确认的变更应用到缓存，返回新的缓存
    pub fn applied(mut self, mutation: Mutation<T>) -> Self {
        match mutation {
            Mutation::Created(item) => self.items.push(item),
            Mutation::Updated(id, item) => {
                for existing in self.items.iter_mut().filter(|e| e.id() == id) {
                    *existing = item.clone();
                }
            }
            Mutation::Deleted(id) => self.items.retain(|e| e.id() != id),
        }
        self
    }

    /// 服务端结果成功时应用变更，失败时缓存不变
    pub fn write_through<E>(&mut self, confirmed: Result<Mutation<T>, E>) -> Result<(), E> {
        let mutation = confirmed?;
        *self = std::mem::take(self).applied(mutation);
        Ok(())
    }

    /// 用服务端的完整列表替换缓存
    pub fn refresh<E>(&mut self, fetched: Result<Vec<T>, E>) -> Result<(), E> {
        self.items = fetched?;
        Ok(())
    }

    pub fn create<E>(&mut self, call: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let created = call()?;
        self.write_through::<E>(Ok(Mutation::Created(created.clone())))?;
        Ok(created)
    }

    pub fn update<E>(
        &mut self,
        id: &str,
        call: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let updated = call()?;
        self.write_through::<E>(Ok(Mutation::Updated(id.to_string(), updated.clone())))?;
        Ok(updated)
    }

    pub fn delete<E>(&mut self, id: &str, call: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
        call()?;
        self.write_through::<E>(Ok(Mutation::Deleted(id.to_string())))
    }
}

impl RecordCache<Course> {
    /// 按分类筛选
    pub fn in_category<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Course> {
        self.items.iter().filter(move |c| c.category == category_id)
    }
}
