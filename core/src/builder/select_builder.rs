//! Select Builder - 支持 JOIN、WHERE、ORDER BY、LIMIT/OFFSET

use super::condition::{impl_where_methods, WhereClause};
use super::{Statement, StatementBuilder, StatementKind};
use crate::error::{Result, SqlOkError};
use std::fmt;

/// JOIN 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// `INNER JOIN`
    Inner,
    /// `JOIN`
    Plain,
    /// `LEFT JOIN`
    Left,
    /// `FULL OUTER JOIN`
    Outer,
    /// `RIGHT JOIN`
    Right,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Plain => "JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Outer => "FULL OUTER JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个 JOIN 子句
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinType,
    pub table: String,
    pub on: String,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ON {}", self.kind, self.table, self.on)
    }
}

/// Select Builder
///
/// ```rust,ignore
/// let stmt = SelectBuilder::new()
///     .select(["id", "name"])
///     .from("auser")
///     .where_("name = $1", binds!["ana"])
///     .order_by(["id"])
///     .limit(10)
///     .build()?;
/// assert_eq!(
///     stmt.sql(),
///     "SELECT id, name FROM auser WHERE name = $1 ORDER BY id LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    columns: Vec<String>,
    table: Option<String>,
    joins: Vec<Join>,
    where_clause: WhereClause,
    order_by: Vec<String>,
    limit: u64,
    offset: u64,
}

impl SelectBuilder {
    /// 创建 SelectBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加要查询的列（可多次调用）
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// 指定 FROM 表
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// 添加 JOIN，按调用顺序渲染
    pub fn join(
        &mut self,
        kind: JoinType,
        table: impl Into<String>,
        on: impl Into<String>,
    ) -> &mut Self {
        self.joins.push(Join {
            kind,
            table: table.into(),
            on: on.into(),
        });
        self
    }

    pub fn inner_join(&mut self, table: impl Into<String>, on: impl Into<String>) -> &mut Self {
        self.join(JoinType::Inner, table, on)
    }

    pub fn left_join(&mut self, table: impl Into<String>, on: impl Into<String>) -> &mut Self {
        self.join(JoinType::Left, table, on)
    }

    /// 追加 ORDER BY 列（可包含 `DESC` 等修饰）
    pub fn order_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// 设置 LIMIT，0 表示不限制
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = limit;
        self
    }

    /// 设置 OFFSET，0 表示不跳过
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = offset;
        self
    }
}

impl_where_methods!(SelectBuilder);

impl StatementBuilder for SelectBuilder {
    const KIND: StatementKind = StatementKind::Select;

    fn build(&mut self) -> Result<Statement> {
        let state = std::mem::take(self);

        let table = state
            .table
            .filter(|t| !t.is_empty())
            .ok_or(SqlOkError::MissingTable(Self::KIND))?;
        if state.columns.is_empty() {
            return Err(SqlOkError::NoColumns);
        }
        state.where_clause.validate(Self::KIND, 0)?;

        let mut sql = format!("SELECT {} FROM {}", state.columns.join(", "), table);
        for join in &state.joins {
            sql.push(' ');
            sql.push_str(&join.to_string());
        }
        state.where_clause.write_sql(&mut sql);
        if !state.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&state.order_by.join(", "));
        }
        if state.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", state.limit));
        }
        if state.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", state.offset));
        }

        Ok(Statement::new(Self::KIND, sql, state.where_clause.into_args()))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binds;
    use crate::builder::BindValue;

    #[test]
    fn test_select_minimal() {
        let stmt = SelectBuilder::new()
            .select(["id", "name"])
            .from("auser")
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "SELECT id, name FROM auser");
        assert!(stmt.args().is_empty());
        assert_eq!(stmt.kind(), StatementKind::Select);
    }

    #[test]
    fn test_select_where_and() {
        let stmt = SelectBuilder::new()
            .select(["*"])
            .from("t")
            .where_("a=$1", binds![1])
            .and("b=$2", binds![2])
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM t WHERE a=$1 AND b=$2");
        assert_eq!(stmt.args(), &[BindValue::Int32(1), BindValue::Int32(2)]);
    }

    #[test]
    fn test_select_where_or() {
        let stmt = SelectBuilder::new()
            .select(["*"])
            .from("t")
            .where_("a=$1", binds![1])
            .or("b=$2", binds![2])
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM t WHERE a=$1 OR b=$2");
    }

    #[test]
    fn test_select_single_where_has_no_connector() {
        let stmt = SelectBuilder::new()
            .select(["*"])
            .from("t")
            .where_("a=$1", binds![1])
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM t WHERE a=$1");
    }

    #[test]
    fn test_select_multiple_args_in_one_fragment() {
        let stmt = SelectBuilder::new()
            .select(["id"])
            .from("t")
            .where_("a BETWEEN $1 AND $2", [10i64, 20])
            .and("name <> $3", ["x"])
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT id FROM t WHERE a BETWEEN $1 AND $2 AND name <> $3"
        );
        assert_eq!(stmt.args(), binds![10i64, 20i64, "x"].as_slice());
    }

    #[test]
    fn test_select_joins_keep_declaration_order() {
        let stmt = SelectBuilder::new()
            .select(["u.id", "p.title", "c.body"])
            .from("auser u")
            .join(JoinType::Left, "post p", "p.user_id = u.id")
            .join(JoinType::Inner, "comment c", "c.post_id = p.id")
            .join(JoinType::Plain, "tag g", "g.id = c.tag_id")
            .join(JoinType::Right, "r", "r.id = g.id")
            .join(JoinType::Outer, "o", "o.id = r.id")
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT u.id, p.title, c.body FROM auser u \
             LEFT JOIN post p ON p.user_id = u.id \
             INNER JOIN comment c ON c.post_id = p.id \
             JOIN tag g ON g.id = c.tag_id \
             RIGHT JOIN r ON r.id = g.id \
             FULL OUTER JOIN o ON o.id = r.id"
        );
    }

    #[test]
    fn test_select_order_limit_offset_are_distinct() {
        let stmt = SelectBuilder::new()
            .select(["id"])
            .from("t")
            .order_by(["name", "id DESC"])
            .limit(10)
            .offset(20)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT id FROM t ORDER BY name, id DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_select_offset_without_limit() {
        let stmt = SelectBuilder::new()
            .select(["id"])
            .from("t")
            .offset(5)
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "SELECT id FROM t OFFSET 5");
    }

    #[test]
    fn test_select_build_resets_state() {
        let mut builder = SelectBuilder::new();
        builder
            .select(["id"])
            .from("t")
            .where_("id = $1", binds![1])
            .order_by(["id"])
            .limit(1);
        builder.build().unwrap();
        assert_eq!(builder, SelectBuilder::default());

        // 第二次 build 没有任何子句
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SqlOkError::MissingTable(StatementKind::Select)));

        let stmt = builder.select(["name"]).from("u").build().unwrap();
        assert_eq!(stmt.sql(), "SELECT name FROM u");
        assert!(stmt.args().is_empty());
    }

    #[test]
    fn test_select_validation_errors_reset_builder() {
        let mut builder = SelectBuilder::new();
        builder.from("t").where_("id = $1", binds![1]);
        assert!(matches!(builder.build(), Err(SqlOkError::NoColumns)));
        assert_eq!(builder, SelectBuilder::default());

        builder.select(["id"]);
        assert!(matches!(
            builder.build(),
            Err(SqlOkError::MissingTable(StatementKind::Select))
        ));

        builder.select(["id"]).from("");
        assert!(builder.build().unwrap_err().is_validation());
    }

    #[test]
    fn test_select_placeholder_mismatch() {
        let mut builder = SelectBuilder::new();
        builder
            .select(["id"])
            .from("t")
            .where_("a = $1", binds![1])
            .and("b = $1", binds![2]);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SqlOkError::PlaceholderMismatch { .. }));
        assert_eq!(builder, SelectBuilder::default());
    }

    #[test]
    fn test_select_rejects_args_bound_to_another_fragment() {
        let mut builder = SelectBuilder::new();
        builder
            .select(["*"])
            .from("t")
            .where_("a = $2", binds!["x"])
            .and("b = $1", binds!["y"]);
        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            SqlOkError::PlaceholderMismatch {
                kind: StatementKind::Select,
                first: 1,
                count: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_select_clear() {
        let mut builder = SelectBuilder::new();
        builder.select(["id"]).from("t").limit(3);
        builder.clear();
        assert_eq!(builder, SelectBuilder::default());
    }
}
