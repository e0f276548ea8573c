//! Insert Builder - 支持多行 VALUES 和 RETURNING

use super::bind_value::BindValue;
use super::placeholder::placeholder_list;
use super::{Statement, StatementBuilder, StatementKind};
use crate::error::{Result, SqlOkError};

/// Insert Builder
///
/// 每次调用 `values()` 追加一行，占位符跨行连续编号：
///
/// ```rust,ignore
/// let stmt = InsertBuilder::new()
///     .insert_into("t")
///     .columns(["a", "b"])
///     .values([1, 2])
///     .values([3, 4])
///     .build()?;
/// assert_eq!(stmt.sql(), "INSERT INTO t (a, b) VALUES ($1, $2), ($3, $4)");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertBuilder {
    table: Option<String>,
    columns: Vec<String>,
    rows: Vec<Vec<BindValue>>,
    returning: Option<String>,
}

impl InsertBuilder {
    /// 创建 InsertBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定目标表
    pub fn insert_into(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// 追加插入的列（可多次调用）
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// 追加一行值
    pub fn values<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// 设置 RETURNING 的主键列（单个整数主键）
    pub fn returning(&mut self, key_column: impl Into<String>) -> &mut Self {
        self.returning = Some(key_column.into());
        self
    }

    /// 当前配置的 RETURNING 列
    pub fn returning_key(&self) -> Option<&str> {
        self.returning.as_deref()
    }

    /// 生成语句；`with_returning` 为 false 时即使配置了主键列也不输出 RETURNING
    pub(crate) fn build_with(&mut self, with_returning: bool) -> Result<Statement> {
        let state = std::mem::take(self);

        let table = state
            .table
            .filter(|t| !t.is_empty())
            .ok_or(SqlOkError::MissingTable(Self::KIND))?;
        let first = state.rows.first().ok_or(SqlOkError::NoRows)?;

        // 声明了列时以列数为准，否则以第一行为准
        let expected = if state.columns.is_empty() {
            first.len()
        } else {
            state.columns.len()
        };
        for (row, values) in state.rows.iter().enumerate() {
            if values.len() != expected || values.is_empty() {
                return Err(SqlOkError::RowArity {
                    row,
                    expected,
                    actual: values.len(),
                });
            }
        }

        let mut sql = format!("INSERT INTO {}", table);
        if !state.columns.is_empty() {
            sql.push_str(&format!(" ({})", state.columns.join(", ")));
        }

        let tuples = (0..state.rows.len())
            .map(|row| format!("({})", placeholder_list(row * expected, expected)))
            .collect::<Vec<_>>();
        sql.push_str(" VALUES ");
        sql.push_str(&tuples.join(", "));

        if with_returning {
            if let Some(key) = state.returning.as_deref().filter(|k| !k.is_empty()) {
                sql.push_str(" RETURNING ");
                sql.push_str(key);
            }
        }

        let args = state.rows.into_iter().flatten().collect();
        Ok(Statement::new(Self::KIND, sql, args))
    }
}

impl StatementBuilder for InsertBuilder {
    const KIND: StatementKind = StatementKind::Insert;

    fn build(&mut self) -> Result<Statement> {
        self.build_with(true)
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}
