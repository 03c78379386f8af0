use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::nullable;
use crate::core::query::QueryShape;
use crate::core::sql::{ColumnNames, Predicate, SqlValue, Transform};

/// equity 为 NUMERIC，序列化为字符串以保持精度 (例如 "0.1")
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// 公司详情中嵌入的职位 (不重复 company_handle)
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(title) = self.title {
            fields.push(("title", SqlValue::Text(Some(title))));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", SqlValue::Integer(salary.map(i64::from))));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", SqlValue::Decimal(equity)));
        }
        fields
    }
}

/// 职位字段名与列名一致
pub const COLUMN_NAMES: ColumnNames = &[];

pub const QUERY_SHAPE: QueryShape = QueryShape {
    numeric: &["minSalary"],
    flags: &["hasEquity"],
    bounds: &[],
};

pub const SEARCH_PREDICATES: &[Predicate] = &[
    Predicate::present("title", "\"title\" ILIKE ", Transform::Wildcard),
    Predicate::present("minSalary", "\"salary\" >=", Transform::Identity),
    Predicate::flag("hasEquity", "\"equity\" >", true, 0),
];
