//! 数据库结构读取
//!
//! 通过 `information_schema` 列出用户表及其字段，查询语句由 [`SelectBuilder`] 生成。

use crate::binds;
use crate::builder::{SelectBuilder, Statement, StatementBuilder};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 表结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub fields: Vec<Field>,
}

impl Table {
    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// 按名称查找字段
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// 字段结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

/// 列出所有用户表（排除系统 schema），按 schema、表名排序
pub fn tables_statement() -> Result<Statement> {
    SelectBuilder::new()
        .select([
            "table_schema::text AS table_schema",
            "table_name::text AS table_name",
        ])
        .from("information_schema.tables")
        .where_("table_type = $1", binds!["BASE TABLE"])
        .and(
            "table_schema NOT IN ($2, $3)",
            binds!["pg_catalog", "information_schema"],
        )
        .order_by(["table_schema", "table_name"])
        .build()
}

/// 列出一张表的字段，按定义顺序排序
pub fn columns_statement(schema: &str, table: &str) -> Result<Statement> {
    SelectBuilder::new()
        .select([
            "column_name::text AS column_name",
            "data_type::text AS data_type",
            "is_nullable::text AS is_nullable",
            "column_default::text AS column_default",
        ])
        .from("information_schema.columns")
        .where_("table_schema = $1", binds![schema])
        .and("table_name = $2", binds![table])
        .order_by(["ordinal_position"])
        .build()
}

/// 数据库结构加载器
#[async_trait::async_trait]
pub trait DatabaseLoader {
    /// 读取所有表及其字段，替换之前加载的结果
    async fn load(&mut self) -> Result<()>;

    /// 最近一次 `load()` 的结果
    fn tables(&self) -> &[Table];
}

#[cfg(feature = "postgres")]
pub use postgres::PostgresLoader;

#[cfg(feature = "postgres")]
mod postgres {
    use super::{columns_statement, tables_statement, DatabaseLoader, Field, Table};
    use crate::database_info::DbDriver;
    use crate::error::{Result, SqlOkError};
    use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
    use sqlx::Row;

    /// PostgreSQL 结构加载器
    #[derive(Debug, Clone)]
    pub struct PostgresLoader {
        pool: PgPool,
        tables: Vec<Table>,
    }

    impl PostgresLoader {
        /// 连接数据库
        pub async fn connect(url: &str) -> Result<Self> {
            if DbDriver::from_url(url)? != DbDriver::Postgres {
                return Err(SqlOkError::UnsupportedDatabase(url.to_string()));
            }
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            Ok(Self::from_pool(pool))
        }

        pub fn from_pool(pool: PgPool) -> Self {
            Self {
                pool,
                tables: Vec::new(),
            }
        }

        pub fn pool(&self) -> &PgPool {
            &self.pool
        }

        /// 关闭连接池
        pub async fn disconnect(&self) {
            self.pool.close().await;
        }

        async fn load_fields(&self, table: &mut Table) -> Result<()> {
            let statement = columns_statement(&table.schema, &table.name)?;
            let rows = statement
                .fetch_all::<sqlx::Postgres, _>(&self.pool)
                .await?;
            table.fields = rows.iter().map(field_from_row).collect::<Result<_>>()?;
            Ok(())
        }
    }

    fn table_from_row(row: &PgRow) -> Result<Table> {
        Ok(Table {
            schema: row.try_get("table_schema").map_err(SqlOkError::Decode)?,
            name: row.try_get("table_name").map_err(SqlOkError::Decode)?,
            fields: Vec::new(),
        })
    }

    fn field_from_row(row: &PgRow) -> Result<Field> {
        let is_nullable: String = row.try_get("is_nullable").map_err(SqlOkError::Decode)?;
        Ok(Field {
            name: row.try_get("column_name").map_err(SqlOkError::Decode)?,
            data_type: row.try_get("data_type").map_err(SqlOkError::Decode)?,
            nullable: is_nullable.eq_ignore_ascii_case("YES"),
            default: row.try_get("column_default").map_err(SqlOkError::Decode)?,
        })
    }

    #[async_trait::async_trait]
    impl DatabaseLoader for PostgresLoader {
        async fn load(&mut self) -> Result<()> {
            let statement = tables_statement()?;
            let rows = statement
                .fetch_all::<sqlx::Postgres, _>(&self.pool)
                .await?;
            let mut tables = rows.iter().map(table_from_row).collect::<Result<Vec<_>>>()?;

            for table in &mut tables {
                self.load_fields(table).await?;
            }

            tracing::info!(
                tables = tables.len(),
                fields = tables.iter().map(|t| t.fields.len()).sum::<usize>(),
                "database schema loaded"
            );
            self.tables = tables;
            Ok(())
        }

        fn tables(&self) -> &[Table] {
            &self.tables
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BindValue;

    #[test]
    fn test_tables_statement() {
        let stmt = tables_statement().unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT table_schema::text AS table_schema, table_name::text AS table_name \
             FROM information_schema.tables \
             WHERE table_type = $1 AND table_schema NOT IN ($2, $3) \
             ORDER BY table_schema, table_name"
        );
        assert_eq!(
            stmt.args(),
            binds!["BASE TABLE", "pg_catalog", "information_schema"].as_slice()
        );
    }

    #[test]
    fn test_columns_statement() {
        let stmt = columns_statement("public", "auser").unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT column_name::text AS column_name, data_type::text AS data_type, \
             is_nullable::text AS is_nullable, column_default::text AS column_default \
             FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2 \
             ORDER BY ordinal_position"
        );
        assert_eq!(
            stmt.args(),
            &[
                BindValue::String("public".to_string()),
                BindValue::String("auser".to_string())
            ]
        );
    }

    #[test]
    fn test_table_serializes_field_type() {
        let table = Table {
            schema: "public".to_string(),
            name: "auser".to_string(),
            fields: vec![Field {
                name: "id".to_string(),
                data_type: "integer".to_string(),
                nullable: false,
                default: Some("nextval('auser_id_seq'::regclass)".to_string()),
            }],
        };
        assert_eq!(table.qualified_name(), "public.auser");
        assert!(table.field("id").is_some());
        assert!(table.field("name").is_none());

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["fields"][0]["type"], "integer");
        assert_eq!(json["fields"][0]["nullable"], false);
    }
}
