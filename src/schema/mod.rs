//! 声明式的表结构注册表
//!
//! 每张表是一组有序的 `(字段名, FieldSpec)`，迁移引擎只读取这些数据，
//! 不为具体的表生成专门的 SQL。

pub mod migration;

use lazy_static::lazy_static;
use std::fmt;

/// 字段的基础类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
        }
    }
}

/// 字段默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for DefaultValue {
    // 输出为 SQL 字面量
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// 单个字段的声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<DefaultValue>,
    /// 仅在建表时生效，SQLite 的 ADD COLUMN 无法补加主键
    pub primary_key: bool,
    /// 同上，只在建表时生效
    pub unique: bool,
}

impl FieldSpec {
    pub fn text() -> Self {
        Self::of(FieldKind::Text)
    }

    pub fn integer() -> Self {
        Self::of(FieldKind::Integer)
    }

    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            primary_key: false,
            unique: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// 向已有表补列时使用的列定义（不含列名）
    ///
    /// 必填的文本列默认空串，必填的整数列使用声明的默认值（缺省为 0），
    /// 可选列保持可空。
    pub fn add_column_definition(&self) -> String {
        let sql_type = self.kind.sql_type();
        if !self.required {
            return sql_type.to_string();
        }
        let default = match (&self.default, self.kind) {
            (Some(value), _) => value.clone(),
            (None, FieldKind::Text) => DefaultValue::Text(String::new()),
            (None, FieldKind::Integer) => DefaultValue::Integer(0),
        };
        format!("{} NOT NULL DEFAULT {}", sql_type, default)
    }

    /// 建表时使用的列定义（不含列名）
    pub fn create_column_definition(&self) -> String {
        let mut def = self.kind.sql_type().to_string();
        if self.primary_key {
            def.push_str(" PRIMARY KEY");
        }
        if self.required {
            def.push_str(" NOT NULL");
        }
        if self.unique {
            def.push_str(" UNIQUE");
        }
        if let Some(value) = &self.default {
            def.push_str(&format!(" DEFAULT {}", value));
        }
        def
    }
}

/// 一张表的结构
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<(String, FieldSpec)>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, spec)| spec)
    }
}

/// 全部表的结构，按声明顺序迁移
#[derive(Debug, Clone, Default)]
pub struct EntitySchema {
    pub tables: Vec<TableSchema>,
}

impl EntitySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }
}

pub const COURSES_TABLE: &str = "courses";
pub const CATEGORIES_TABLE: &str = "categories";

lazy_static! {
    static ref CATALOG_SCHEMA: EntitySchema = EntitySchema::new()
        .table(
            TableSchema::new(COURSES_TABLE)
                .field("id", FieldSpec::text().primary_key())
                .field("title", FieldSpec::text().required())
                .field("category", FieldSpec::text().required())
                .field("imageUrl", FieldSpec::text().required())
                .field("shareLink", FieldSpec::text().required())
                .field("platform", FieldSpec::text().required())
                .field("password", FieldSpec::text())
                .field("teacher", FieldSpec::text())
                .field("createdAt", FieldSpec::text().required())
                .field("totalEpisodes", FieldSpec::integer())
                .field(
                    "watchedEpisodes",
                    FieldSpec::integer()
                        .required()
                        .default_value(DefaultValue::Integer(0)),
                ),
        )
        .table(
            TableSchema::new(CATEGORIES_TABLE)
                .field("id", FieldSpec::text().primary_key())
                .field("name", FieldSpec::text().required().unique())
                .field("icon", FieldSpec::text().required()),
        );
}

/// 课程库的表结构，进程内只读
pub fn catalog_schema() -> &'static EntitySchema {
    &CATALOG_SCHEMA
}
