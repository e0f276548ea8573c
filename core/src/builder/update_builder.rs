//! Update Builder - SET 赋值和 WHERE 条件

use super::bind_value::BindValue;
use super::condition::{impl_where_methods, WhereClause};
use super::placeholder::placeholder;
use super::{Statement, StatementBuilder, StatementKind};
use crate::error::{Result, SqlOkError};

/// Update Builder
///
/// SET 的占位符从 `$1` 开始编号，WHERE 片段中的占位符紧接其后：
///
/// ```rust,ignore
/// let stmt = UpdateBuilder::new()
///     .update("t")
///     .set("a", 1)
///     .set("b", 2)
///     .where_("id=$3", binds![5])
///     .build()?;
/// assert_eq!(stmt.sql(), "UPDATE t SET a = $1, b = $2 WHERE id=$3");
/// ```
///
/// 注意：没有 WHERE 条件的 UPDATE 会更新表中所有行。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    table: Option<String>,
    assignments: Vec<(String, BindValue)>,
    where_clause: WhereClause,
}

impl UpdateBuilder {
    /// 创建 UpdateBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定目标表
    pub fn update(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// 追加一个 `column = $n` 赋值
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<BindValue>) -> &mut Self {
        self.assignments.push((column.into(), value.into()));
        self
    }
}

impl_where_methods!(UpdateBuilder);

impl StatementBuilder for UpdateBuilder {
    const KIND: StatementKind = StatementKind::Update;

    fn build(&mut self) -> Result<Statement> {
        let state = std::mem::take(self);

        let table = state
            .table
            .filter(|t| !t.is_empty())
            .ok_or(SqlOkError::MissingTable(Self::KIND))?;
        if state.assignments.is_empty() {
            return Err(SqlOkError::NoAssignments);
        }
        let offset = state.assignments.len();
        state.where_clause.validate(Self::KIND, offset)?;

        let set_parts = state
            .assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = {}", column, placeholder(i)))
            .collect::<Vec<_>>();
        let mut sql = format!("UPDATE {} SET {}", table, set_parts.join(", "));
        state.where_clause.write_sql(&mut sql);

        let mut args: Vec<BindValue> = state
            .assignments
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        args.extend(state.where_clause.into_args());

        Ok(Statement::new(Self::KIND, sql, args))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binds;

    #[test]
    fn test_update_composition() {
        let stmt = UpdateBuilder::new()
            .update("t")
            .set("a", 1)
            .set("b", 2)
            .where_("id=$3", binds![5])
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "UPDATE t SET a = $1, b = $2 WHERE id=$3");
        assert_eq!(stmt.args(), binds![1, 2, 5].as_slice());
    }

    #[test]
    fn test_update_without_where_touches_every_row() {
        let stmt = UpdateBuilder::new()
            .update("auser")
            .set("description", None::<String>)
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "UPDATE auser SET description = $1");
        assert_eq!(stmt.args(), &[BindValue::Null]);
    }

    #[test]
    fn test_update_where_and_or() {
        let stmt = UpdateBuilder::new()
            .update("auser")
            .set("name", "bob")
            .where_("id = $2", binds![1i64])
            .or("id = $3", binds![2i64])
            .and("name <> $4", binds!["bob"])
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "UPDATE auser SET name = $1 WHERE id = $2 OR id = $3 AND name <> $4"
        );
        assert_eq!(stmt.args(), binds!["bob", 1i64, 2i64, "bob"].as_slice());
    }

    #[test]
    fn test_update_where_must_continue_after_set() {
        let mut builder = UpdateBuilder::new();
        builder.update("t").set("a", 1).where_("id = $1", binds![5]);
        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            SqlOkError::PlaceholderMismatch {
                kind: StatementKind::Update,
                first: 2,
                count: 1,
                ..
            }
        ));
        assert_eq!(builder, UpdateBuilder::default());
    }

    #[test]
    fn test_update_requires_table_and_assignments() {
        let mut builder = UpdateBuilder::new();
        builder.set("a", 1);
        assert!(matches!(
            builder.build(),
            Err(SqlOkError::MissingTable(StatementKind::Update))
        ));

        builder.update("t").where_("id = $1", binds![1]);
        assert!(matches!(builder.build(), Err(SqlOkError::NoAssignments)));
    }

    #[test]
    fn test_update_build_resets_state() {
        let mut builder = UpdateBuilder::new();
        builder.update("t").set("a", 1).where_("id = $2", binds![2]);
        builder.build().unwrap();
        assert_eq!(builder, UpdateBuilder::default());
        assert!(builder.build().unwrap_err().is_validation());

        let stmt = builder.update("t").set("b", true).build().unwrap();
        assert_eq!(stmt.sql(), "UPDATE t SET b = $1");
        assert_eq!(stmt.args(), &[BindValue::Bool(true)]);
    }
}
