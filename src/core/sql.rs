use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// 按位置绑定的 SQL 标量值 (类型化，允许 NULL)
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Decimal(Option<Decimal>),
}

impl SqlValue {
    pub fn text(v: impl Into<String>) -> Self {
        Self::Text(Some(v.into()))
    }

    /// 过滤条件中的 JSON 值转为绑定参数
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Text(None),
            Value::Bool(b) => Self::Bool(Some(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(Some(i)),
                None => Self::Float(n.as_f64()),
            },
            Value::String(s) => Self::Text(Some(s.clone())),
            other => Self::Text(Some(other.to_string())),
        }
    }
}

/// 参数化 SQL 片段 + 位置参数列表。
/// `$n` 对应 `values[n - 1]`，编号从 1 连续递增。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clause {
    pub fragment: String,
    pub values: Vec<SqlValue>,
}

impl Clause {
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// 下一个可用的占位符编号 (用于在片段之后追加主键等参数)
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// 逻辑字段名 -> 物理列名
pub type ColumnNames = &'static [(&'static str, &'static str)];

fn column_name<'a>(columns: ColumnNames, field: &'a str) -> &'a str {
    columns
        .iter()
        .find(|(logical, _)| *logical == field)
        .map(|(_, physical)| *physical)
        .unwrap_or(field)
}

/// 部分更新：生成 `"col1"=$1, "col2"=$2` 形式的 SET 片段
pub fn build_update_clause<K: AsRef<str>>(
    fields: &[(K, SqlValue)],
    columns: ColumnNames,
) -> AppResult<Clause> {
    if fields.is_empty() {
        return Err(AppError::validation("No data"));
    }

    let cols: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(idx, (field, _))| format!("\"{}\"=${}", column_name(columns, field.as_ref()), idx + 1))
        .collect();

    Ok(Clause {
        fragment: cols.join(", "),
        values: fields.iter().map(|(_, v)| v.clone()).collect(),
    })
}

/// 过滤条件何时生效
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// 键存在即生效
    Present,
    /// 键的值等于给定布尔值时生效
    Flag(bool),
}

/// 绑定参数前对过滤值的变换
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    Identity,
    /// 包裹为 `%value%` 用于 ILIKE
    Wildcard,
    /// 忽略原值，绑定固定整数
    Literal(i64),
}

/// 单条过滤谓词声明：`prefix` 之后紧接占位符，例如 `"salary" >=` + `$2`
#[derive(Debug, Clone, Copy)]
pub struct Predicate {
    pub key: &'static str,
    pub prefix: &'static str,
    pub trigger: Trigger,
    pub transform: Transform,
}

impl Predicate {
    pub const fn present(key: &'static str, prefix: &'static str, transform: Transform) -> Self {
        Self {
            key,
            prefix,
            trigger: Trigger::Present,
            transform,
        }
    }

    pub const fn flag(key: &'static str, prefix: &'static str, expected: bool, literal: i64) -> Self {
        Self {
            key,
            prefix,
            trigger: Trigger::Flag(expected),
            transform: Transform::Literal(literal),
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self.trigger {
            Trigger::Present => true,
            Trigger::Flag(expected) => value.as_bool() == Some(expected),
        }
    }

    fn bind_value(&self, value: &Value) -> SqlValue {
        match self.transform {
            Transform::Identity => SqlValue::from_json(value),
            Transform::Wildcard => {
                let raw = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                SqlValue::text(format!("%{}%", raw))
            }
            Transform::Literal(n) => SqlValue::Integer(Some(n)),
        }
    }
}

/// 按谓词声明顺序生成 WHERE 片段 (不含 WHERE 关键字)。
/// 占位符编号在所有命中的谓词之间连续递增；无命中时返回空片段。
pub fn build_search_clause(filters: &Map<String, Value>, predicates: &[Predicate]) -> Clause {
    let mut parts = Vec::new();
    let mut values = Vec::new();

    for predicate in predicates {
        let Some(value) = filters.get(predicate.key) else {
            continue;
        };
        if !predicate.matches(value) {
            continue;
        }
        values.push(predicate.bind_value(value));
        parts.push(format!("{}${}", predicate.prefix, values.len()));
    }

    Clause {
        fragment: parts.join(" AND "),
        values,
    }
}
