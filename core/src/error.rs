use crate::builder::{BindValue, StatementKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlOkError {
    /// 未指定目标表
    #[error("{0} statement requires a target table")]
    MissingTable(StatementKind),
    /// SELECT 没有任何列
    #[error("SELECT statement requires at least one column")]
    NoColumns,
    /// UPDATE 没有任何 SET 赋值
    #[error("UPDATE statement requires at least one SET assignment")]
    NoAssignments,
    /// INSERT 没有任何 VALUES 行
    #[error("INSERT statement requires at least one VALUES row")]
    NoRows,
    /// VALUES 行的元素个数与列数不一致
    #[error("VALUES row {row} has {actual} value(s), expected {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// WHERE 片段中的占位符与绑定参数不对齐
    #[error(
        "{kind} WHERE fragment references placeholders {found:?} but binds {count} argument(s) starting at ${first}"
    )]
    PlaceholderMismatch {
        kind: StatementKind,
        first: usize,
        count: usize,
        found: Vec<usize>,
    },
    /// 语句执行失败，附带语句文本与参数便于排查
    #[error("query execution failed: {source} (sql: {sql}, args: {args:?})")]
    Execution {
        sql: String,
        args: Vec<BindValue>,
        #[source]
        source: sqlx::Error,
    },
    /// 读取结果行失败
    #[error("Failed reading row: {0}")]
    Decode(#[source] sqlx::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
}

impl SqlOkError {
    /// 是否为 build() 阶段产生的校验错误（尚未触达数据库）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SqlOkError::MissingTable(_)
                | SqlOkError::NoColumns
                | SqlOkError::NoAssignments
                | SqlOkError::NoRows
                | SqlOkError::RowArity { .. }
                | SqlOkError::PlaceholderMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SqlOkError>;
