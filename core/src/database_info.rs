//! 数据库信息抽象层
//!
//! 提供统一的接口来访问不同数据库的特性：RETURNING 支持、影响行数、
//! 自增主键以及参数绑定。

use crate::builder::BindValue;
use crate::error::{Result, SqlOkError};
use sqlx::query::Query;
use sqlx::Database;
use std::fmt;

/// 数据库驱动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    Postgres,
    Sqlite,
}

impl DbDriver {
    /// 根据连接 URL 判断驱动类型
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DbDriver::Postgres)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(DbDriver::Sqlite)
        } else {
            Err(SqlOkError::UnsupportedDatabase(url.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DbDriver::Postgres => "postgres",
            DbDriver::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DbDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 数据库信息 trait
///
/// 每个数据库类型（`sqlx::Postgres`, `sqlx::Sqlite`）实现一次，
/// 执行层通过它获取与后端相关的行为，而不是在每次调用时判断。
pub trait DatabaseInfo: Database {
    /// 获取数据库驱动类型
    fn get_driver() -> DbDriver;

    /// INSERT 是否使用 `RETURNING` 取回生成的主键
    ///
    /// 返回 false 时执行层改用 [`last_insert_id`](Self::last_insert_id)。
    fn supports_returning() -> bool;

    /// 语句影响的行数
    fn rows_affected(result: &Self::QueryResult) -> u64;

    /// 驱动报告的最后插入行 ID（不支持时为 None）
    fn last_insert_id(result: &Self::QueryResult) -> Option<i64>;

    /// 将一个绑定值应用到查询上
    fn bind_value<'q>(
        query: Query<'q, Self, <Self as Database>::Arguments<'q>>,
        value: BindValue,
    ) -> Query<'q, Self, <Self as Database>::Arguments<'q>>;

    /// 读取 `RETURNING <key>` 返回行中的整数主键
    fn returned_id(row: &Self::Row) -> std::result::Result<i64, sqlx::Error>;
}

macro_rules! bind_value_by_variant {
    ($query:expr, $value:expr) => {
        match $value {
            BindValue::String(s) => $query.bind(s),
            BindValue::Int64(i) => $query.bind(i),
            BindValue::Int32(i) => $query.bind(i),
            BindValue::Int16(i) => $query.bind(i),
            BindValue::Float64(f) => $query.bind(f),
            BindValue::Float32(f) => $query.bind(f),
            BindValue::Bool(b) => $query.bind(b),
            BindValue::Bytes(b) => $query.bind(b),
            BindValue::DateTime(dt) => $query.bind(dt),
            BindValue::Null => $query.bind(None::<String>),
        }
    };
}

macro_rules! returned_id_from_first_column {
    ($row:expr) => {{
        use sqlx::Row;
        // serial 主键是 INT4，bigserial 是 INT8
        $row.try_get::<i64, _>(0)
            .or_else(|_| $row.try_get::<i32, _>(0).map(i64::from))
    }};
}

// ========== PostgreSQL 实现 ==========

#[cfg(feature = "postgres")]
impl DatabaseInfo for sqlx::Postgres {
    fn get_driver() -> DbDriver {
        DbDriver::Postgres
    }

    fn supports_returning() -> bool {
        true
    }

    fn rows_affected(result: &sqlx::postgres::PgQueryResult) -> u64 {
        result.rows_affected()
    }

    fn last_insert_id(_result: &sqlx::postgres::PgQueryResult) -> Option<i64> {
        // PostgreSQL 只能通过 RETURNING 取回主键
        None
    }

    fn bind_value<'q>(
        query: Query<'q, Self, <Self as Database>::Arguments<'q>>,
        value: BindValue,
    ) -> Query<'q, Self, <Self as Database>::Arguments<'q>> {
        bind_value_by_variant!(query, value)
    }

    fn returned_id(row: &sqlx::postgres::PgRow) -> std::result::Result<i64, sqlx::Error> {
        returned_id_from_first_column!(row)
    }
}

// ========== SQLite 实现 ==========

#[cfg(feature = "sqlite")]
impl DatabaseInfo for sqlx::Sqlite {
    fn get_driver() -> DbDriver {
        DbDriver::Sqlite
    }

    /// SQLite 3.35+ 虽然支持 RETURNING，这里固定走 `last_insert_rowid()`
    fn supports_returning() -> bool {
        false
    }

    fn rows_affected(result: &sqlx::sqlite::SqliteQueryResult) -> u64 {
        result.rows_affected()
    }

    fn last_insert_id(result: &sqlx::sqlite::SqliteQueryResult) -> Option<i64> {
        Some(result.last_insert_rowid())
    }

    fn bind_value<'q>(
        query: Query<'q, Self, <Self as Database>::Arguments<'q>>,
        value: BindValue,
    ) -> Query<'q, Self, <Self as Database>::Arguments<'q>> {
        bind_value_by_variant!(query, value)
    }

    fn returned_id(row: &sqlx::sqlite::SqliteRow) -> std::result::Result<i64, sqlx::Error> {
        returned_id_from_first_column!(row)
    }
}
