//! Delete Builder - 支持 WHERE 条件进行删除

use super::condition::{impl_where_methods, WhereClause};
use super::{Statement, StatementBuilder, StatementKind};
use crate::error::{Result, SqlOkError};

/// Delete Builder
///
/// 注意：没有 WHERE 条件的 DELETE 会删除表中所有行。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteBuilder {
    table: Option<String>,
    where_clause: WhereClause,
}

impl DeleteBuilder {
    /// 创建 DeleteBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定目标表
    pub fn delete(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// 同 [`delete`](Self::delete)
    pub fn delete_from(&mut self, table: impl Into<String>) -> &mut Self {
        self.delete(table)
    }
}

impl_where_methods!(DeleteBuilder);

impl StatementBuilder for DeleteBuilder {
    const KIND: StatementKind = StatementKind::Delete;

    fn build(&mut self) -> Result<Statement> {
        let state = std::mem::take(self);

        let table = state
            .table
            .filter(|t| !t.is_empty())
            .ok_or(SqlOkError::MissingTable(Self::KIND))?;
        state.where_clause.validate(Self::KIND, 0)?;

        let mut sql = format!("DELETE FROM {}", table);
        state.where_clause.write_sql(&mut sql);

        Ok(Statement::new(Self::KIND, sql, state.where_clause.into_args()))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}
