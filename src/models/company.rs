use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::job::JobSummary;
use super::nullable;
use crate::core::query::QueryShape;
use crate::core::sql::{ColumnNames, Predicate, SqlValue, Transform};

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// 公司详情 (附带该公司的职位)
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// 部分更新：只包含请求体中出现的字段
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    /// 按字段声明顺序展开为 (逻辑字段名, 值)
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(name) = self.name {
            fields.push(("name", SqlValue::Text(Some(name))));
        }
        if let Some(description) = self.description {
            fields.push(("description", SqlValue::Text(Some(description))));
        }
        if let Some(num_employees) = self.num_employees {
            fields.push(("numEmployees", SqlValue::Integer(num_employees.map(i64::from))));
        }
        if let Some(logo_url) = self.logo_url {
            fields.push(("logoUrl", SqlValue::Text(logo_url)));
        }
        fields
    }
}

pub const COLUMN_NAMES: ColumnNames = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

pub const QUERY_SHAPE: QueryShape = QueryShape {
    numeric: &["minEmployees", "maxEmployees"],
    flags: &[],
    bounds: &[("minEmployees", "maxEmployees")],
};

pub const SEARCH_PREDICATES: &[Predicate] = &[
    Predicate::present("nameLike", "\"name\" ILIKE ", Transform::Wildcard),
    Predicate::present("minEmployees", "\"num_employees\" >=", Transform::Identity),
    Predicate::present("maxEmployees", "\"num_employees\" <=", Transform::Identity),
];
