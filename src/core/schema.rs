//! 请求体与查询参数的 JSON Schema 校验
//!
//! Schema 文件编译进二进制，首次使用时编译一次。

use jsonschema::Validator;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

fn compile(source: &str) -> Validator {
    let schema: Value = serde_json::from_str(source).expect("embedded schema is valid JSON");
    jsonschema::options()
        .should_validate_formats(true)
        .build(&schema)
        .expect("embedded schema compiles")
}

pub static COMPANY_NEW: LazyLock<Validator> =
    LazyLock::new(|| compile(include_str!("../../schemas/companyNew.json")));
pub static COMPANY_UPDATE: LazyLock<Validator> =
    LazyLock::new(|| compile(include_str!("../../schemas/companyUpdate.json")));
pub static COMPANY_FILTER: LazyLock<Validator> =
    LazyLock::new(|| compile(include_str!("../../schemas/companyFilter.json")));
pub static JOB_NEW: LazyLock<Validator> =
    LazyLock::new(|| compile(include_str!("../../schemas/jobNew.json")));
pub static JOB_UPDATE: LazyLock<Validator> =
    LazyLock::new(|| compile(include_str!("../../schemas/jobUpdate.json")));
pub static JOB_FILTER: LazyLock<Validator> =
    LazyLock::new(|| compile(include_str!("../../schemas/jobFilter.json")));

/// 校验失败时返回全部错误信息
pub fn validate(validator: &Validator, instance: &Value) -> AppResult<()> {
    let errors: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Schema(errors))
    }
}
