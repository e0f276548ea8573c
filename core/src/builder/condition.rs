//! 条件组合：为 WHERE 片段打上 AND / OR 连接符

use super::bind_value::BindValue;
use super::placeholder::scan_placeholders;
use super::StatementKind;
use crate::error::{Result, SqlOkError};
use std::fmt;

/// 条件连接符：AND 或 OR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 带连接符的条件片段
///
/// 片段文本原样输出，不做任何 SQL 校验。第一个条件紧跟在 `WHERE` 之后，
/// 它的连接符在渲染时被忽略。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    connector: Connector,
    fragment: String,
}

impl Condition {
    pub fn new(connector: Connector, fragment: impl Into<String>) -> Self {
        Self {
            connector,
            fragment: fragment.into(),
        }
    }

    pub fn connector(&self) -> Connector {
        self.connector
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// 用 AND 连接的条件
pub fn and(fragment: impl Into<String>) -> Condition {
    Condition::new(Connector::And, fragment)
}

/// 用 OR 连接的条件
pub fn or(fragment: impl Into<String>) -> Condition {
    Condition::new(Connector::Or, fragment)
}

/// WHERE 子句的累积状态：条件片段和按调用顺序排列的绑定值
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WhereClause {
    conditions: Vec<Condition>,
    // 每个片段随附的参数个数，与 conditions 一一对应
    arg_counts: Vec<usize>,
    args: Vec<BindValue>,
}

impl WhereClause {
    pub(crate) fn push<I>(&mut self, condition: Condition, args: I)
    where
        I: IntoIterator,
        I::Item: Into<BindValue>,
    {
        let before = self.args.len();
        self.args.extend(args.into_iter().map(Into::into));
        self.conditions.push(condition);
        self.arg_counts.push(self.args.len() - before);
    }

    pub(crate) fn into_args(self) -> Vec<BindValue> {
        self.args
    }

    /// 校验占位符与参数对齐
    ///
    /// 每个片段必须引用自己随附参数的全部位置；引用范围不能超出
    /// `$offset+1 ..= $offset+args.len()`，因此后面的片段可以复用前面的位置。
    /// `offset` 为语句中排在 WHERE 之前已占用的参数个数（UPDATE 的 SET 部分）。
    pub(crate) fn validate(&self, kind: StatementKind, offset: usize) -> Result<()> {
        let last = offset + self.args.len();
        let mut first = offset + 1;

        for (condition, &count) in self.conditions.iter().zip(&self.arg_counts) {
            let mut found = scan_placeholders(&condition.fragment);
            found.sort_unstable();
            found.dedup();

            let owns_its_args = (first..first + count).all(|n| found.binary_search(&n).is_ok());
            let in_range = found.iter().all(|&n| n > offset && n <= last);
            if !owns_its_args || !in_range {
                return Err(SqlOkError::PlaceholderMismatch {
                    kind,
                    first,
                    count,
                    found,
                });
            }
            first += count;
        }
        Ok(())
    }

    /// 追加 ` WHERE ...`；没有条件时不输出任何内容
    pub(crate) fn write_sql(&self, sql: &mut String) {
        if self.conditions.is_empty() {
            return;
        }
        sql.push_str(" WHERE ");
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(condition.connector.as_str());
                sql.push(' ');
            }
            sql.push_str(&condition.fragment);
        }
    }
}

/// 为持有 `where_clause: WhereClause` 字段的 builder 生成 `where_` / `and` / `or`
macro_rules! impl_where_methods {
    ($builder:ty) => {
        impl $builder {
            /// 添加 WHERE 条件
            ///
            /// 已有条件时与 [`and`](Self::and) 等价。`args` 按顺序追加到参数列表，
            /// 片段中的 `$n` 需要与它们的位置一致。
            pub fn where_<I>(&mut self, fragment: impl Into<String>, args: I) -> &mut Self
            where
                I: IntoIterator,
                I::Item: Into<$crate::builder::BindValue>,
            {
                self.where_clause
                    .push($crate::builder::condition::and(fragment), args);
                self
            }

            /// 添加用 AND 连接的条件
            pub fn and<I>(&mut self, fragment: impl Into<String>, args: I) -> &mut Self
            where
                I: IntoIterator,
                I::Item: Into<$crate::builder::BindValue>,
            {
                self.where_clause
                    .push($crate::builder::condition::and(fragment), args);
                self
            }

            /// 添加用 OR 连接的条件
            pub fn or<I>(&mut self, fragment: impl Into<String>, args: I) -> &mut Self
            where
                I: IntoIterator,
                I::Item: Into<$crate::builder::BindValue>,
            {
                self.where_clause
                    .push($crate::builder::condition::or(fragment), args);
                self
            }

            /// 直接添加一个已组合好的条件
            pub fn condition<I>(&mut self, condition: $crate::builder::Condition, args: I) -> &mut Self
            where
                I: IntoIterator,
                I::Item: Into<$crate::builder::BindValue>,
            {
                self.where_clause.push(condition, args);
                self
            }
        }
    };
}

pub(crate) use impl_where_methods;
