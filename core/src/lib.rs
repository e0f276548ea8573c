//! 基于 sqlx 的参数化 SQL 语句构建器
//!
//! ```rust,ignore
//! use sqlok::{binds, SelectBuilder, StatementBuilder};
//!
//! let stmt = SelectBuilder::new()
//!     .select(["id", "name"])
//!     .from("auser")
//!     .where_("id = $1", binds![1i64])
//!     .build()?;
//! let rows = stmt.fetch_all(&pool).await?;
//! ```

pub mod builder;
pub mod database_info;
pub mod error;
pub mod executor;
pub mod schema;

pub use builder::{
    and, or, BindValue, Condition, Connector, DeleteBuilder, InsertBuilder, Join, JoinType,
    SelectBuilder, Statement, StatementBuilder, StatementKind, UpdateBuilder,
};
pub use database_info::{DatabaseInfo, DbDriver};
pub use error::{Result, SqlOkError};
pub use executor::ExecResult;
#[cfg(feature = "postgres")]
pub use schema::PostgresLoader;
pub use schema::{DatabaseLoader, Field, Table};
