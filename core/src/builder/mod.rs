//! Statement Builder 模块
//!
//! 提供 SelectBuilder、InsertBuilder、UpdateBuilder 和 DeleteBuilder，
//! 通过链式调用累积子句，`build()` 生成 `$n` 参数化的语句并重置自身。

pub mod bind_value;
pub mod condition;
pub mod delete_builder;
pub mod insert_builder;
pub mod placeholder;
pub mod select_builder;
pub mod update_builder;

pub use bind_value::BindValue;
pub use condition::{and, or, Condition, Connector};
pub use delete_builder::DeleteBuilder;
pub use insert_builder::InsertBuilder;
pub use select_builder::{Join, JoinType, SelectBuilder};
pub use update_builder::UpdateBuilder;

use crate::error::Result;
use std::fmt;

/// 语句类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成好的语句：SQL 文本和按 `$n` 顺序排列的参数
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    args: Vec<BindValue>,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, sql: String, args: Vec<BindValue>) -> Self {
        tracing::trace!(kind = %kind, sql = %sql, args = args.len(), "statement built");
        Self { kind, sql, args }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[BindValue] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        (self.sql, self.args)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// 所有语句 builder 的公共能力
///
/// `build()` 总是先取走累积的状态再渲染，无论成功与否 builder 都会回到空状态。
pub trait StatementBuilder {
    const KIND: StatementKind;

    /// 生成语句并重置 builder
    fn build(&mut self) -> Result<Statement>;

    /// 丢弃已累积的子句
    fn clear(&mut self);
}
