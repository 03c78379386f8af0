use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// 查询参数的类型声明：哪些键是数字、哪些是布尔开关、哪些成对构成上下界
#[derive(Debug, Clone, Copy)]
pub struct QueryShape {
    pub numeric: &'static [&'static str],
    pub flags: &'static [&'static str],
    /// (min 键, max 键)
    pub bounds: &'static [(&'static str, &'static str)],
}

fn parse_number(raw: &str) -> Option<Number> {
    let n: f64 = raw.trim().parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        return Some(Number::from(n as i64));
    }
    Number::from_f64(n)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// 将字符串形式的查询参数转为类型化的过滤条件，并检查上下界关系。
///
/// 输入不会被修改，返回新的映射。无法解析的数字/布尔值原样保留为字符串，
/// 交给后续的 JSON Schema 校验拒绝。
pub fn normalize(raw: &HashMap<String, String>, shape: &QueryShape) -> AppResult<Map<String, Value>> {
    let mut out = Map::new();

    for (key, value) in raw {
        let typed = if shape.numeric.iter().any(|k| *k == key) {
            parse_number(value).map(Value::Number)
        } else if shape.flags.iter().any(|k| *k == key) {
            parse_flag(value).map(Value::Bool)
        } else {
            None
        };
        out.insert(key.clone(), typed.unwrap_or_else(|| Value::String(value.clone())));
    }

    for (min_key, max_key) in shape.bounds {
        let min = out.get(*min_key).and_then(Value::as_f64);
        let max = out.get(*max_key).and_then(Value::as_f64);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(AppError::validation("min needs to be less than max input"));
            }
        }
    }

    Ok(out)
}
