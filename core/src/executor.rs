//! 执行层：把生成好的语句交给 sqlx 执行
//!
//! 执行器可以是 `&Pool<DB>`、`&mut DB::Connection` 或事务，builder 不关心
//! 具体类型，也不做重试或事务管理。超时与取消由调用方负责
//! （丢弃 future 或使用 `tokio::time::timeout`）。

use crate::builder::{
    DeleteBuilder, InsertBuilder, SelectBuilder, Statement, StatementBuilder, UpdateBuilder,
};
use crate::database_info::DatabaseInfo;
use crate::error::{Result, SqlOkError};
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::query::Query;
use sqlx::{Executor, FromRow, IntoArguments};

/// 非查询语句的执行结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// 影响的行数
    pub rows_affected: u64,
    /// 生成的主键（RETURNING 或驱动报告的 last insert id）
    pub last_insert_id: Option<i64>,
}

impl Statement {
    fn query<DB: DatabaseInfo>(&self) -> Query<'_, DB, <DB as sqlx::Database>::Arguments<'_>> {
        self.args()
            .iter()
            .cloned()
            .fold(sqlx::query::<DB>(self.sql()), |query, value| {
                DB::bind_value(query, value)
            })
    }

    fn log_execution<DB: DatabaseInfo>(&self) {
        tracing::debug!(
            target: "sqlok::sql",
            driver = %DB::get_driver(),
            kind = %self.kind(),
            sql = %self.sql(),
            args = ?self.args(),
            "executing statement"
        );
    }

    fn execution_error(&self, source: sqlx::Error) -> SqlOkError {
        SqlOkError::Execution {
            sql: self.sql().to_string(),
            args: self.args().to_vec(),
            source,
        }
    }

    /// 执行并返回惰性的结果行流
    ///
    /// 流只能单向消费一次；丢弃流即释放连接。每一行的错误单独返回，
    /// 调用方决定是否继续消费。
    pub fn fetch<'q, 'c, DB, E>(&'q self, executor: E) -> BoxStream<'q, Result<DB::Row>>
    where
        'c: 'q,
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB> + 'q,
    {
        self.log_execution::<DB>();
        self.query::<DB>()
            .fetch(executor)
            .map_err(move |e| self.execution_error(e))
            .boxed()
    }

    /// 执行并收集所有结果行
    pub async fn fetch_all<'c, DB, E>(&self, executor: E) -> Result<Vec<DB::Row>>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        self.log_execution::<DB>();
        self.query::<DB>()
            .fetch_all(executor)
            .await
            .map_err(|e| self.execution_error(e))
    }

    /// 执行不返回结果行的语句
    pub async fn execute<'c, DB, E>(&self, executor: E) -> Result<ExecResult>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        self.log_execution::<DB>();
        let result = self
            .query::<DB>()
            .execute(executor)
            .await
            .map_err(|e| self.execution_error(e))?;
        Ok(ExecResult {
            rows_affected: DB::rows_affected(&result),
            last_insert_id: DB::last_insert_id(&result),
        })
    }

    /// 执行带 `RETURNING <key>` 的语句
    ///
    /// 影响行数为返回的行数，主键取最后一行的第一列。
    pub async fn execute_returning<'c, DB, E>(&self, executor: E) -> Result<ExecResult>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        let rows = self.fetch_all(executor).await?;
        let last_insert_id = rows
            .last()
            .map(DB::returned_id)
            .transpose()
            .map_err(SqlOkError::Decode)?;
        Ok(ExecResult {
            rows_affected: rows.len() as u64,
            last_insert_id,
        })
    }
}

impl SelectBuilder {
    /// 生成语句、执行并收集所有结果行
    pub async fn fetch_all<'c, DB, E>(&mut self, executor: E) -> Result<Vec<DB::Row>>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        let statement = self.build()?;
        statement.fetch_all(executor).await
    }

    /// 同 [`fetch_all`](Self::fetch_all)，并把每一行解码为 `T`
    pub async fn fetch_all_as<'c, T, DB, E>(&mut self, executor: E) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, DB::Row>,
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        let rows = self.fetch_all(executor).await?;
        rows.iter()
            .map(|row| T::from_row(row).map_err(SqlOkError::Decode))
            .collect()
    }
}

impl InsertBuilder {
    /// 生成语句并执行
    ///
    /// 配置了 `returning()` 且后端支持 RETURNING 时读取返回的主键，
    /// 否则使用驱动报告的 last insert id。
    pub async fn execute<'c, DB, E>(&mut self, executor: E) -> Result<ExecResult>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        let returning =
            DB::supports_returning() && self.returning_key().is_some_and(|key| !key.is_empty());
        let statement = self.build_with(returning)?;
        if returning {
            statement.execute_returning(executor).await
        } else {
            statement.execute(executor).await
        }
    }
}

impl UpdateBuilder {
    /// 生成语句并执行
    pub async fn execute<'c, DB, E>(&mut self, executor: E) -> Result<ExecResult>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        let statement = self.build()?;
        statement.execute(executor).await
    }
}

impl DeleteBuilder {
    /// 生成语句并执行
    pub async fn execute<'c, DB, E>(&mut self, executor: E) -> Result<ExecResult>
    where
        DB: DatabaseInfo,
        for<'a> <DB as sqlx::Database>::Arguments<'a>: IntoArguments<'a, DB>,
        E: Executor<'c, Database = DB>,
    {
        let statement = self.build()?;
        statement.execute(executor).await
    }
}
