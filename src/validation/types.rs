//! 文本数值类型识别与值分类

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DOUBLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?([0-9]+)[.]([0-9]+)$").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

/// 值类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Integer,
    Long,
    Double,
    String,
    List,
    Map,
    Other,
}

/// 从文本解析出的值
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Integer(i32),
    Long(i64),
    Double(f64),
    /// 非数值文本，原样保留
    Text(String),
}

/// 可分类的值
///
/// `Other` 用于承接布尔、空值等不在前六类中的数据。
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectValue {
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
    List(Vec<ObjectValue>),
    Map(BTreeMap<String, ObjectValue>),
    Other(serde_json::Value),
}

impl ObjectValue {
    pub fn object_type(&self) -> ObjectType {
        classify_value(self)
    }
}

impl From<i32> for ObjectValue {
    fn from(value: i32) -> Self {
        ObjectValue::Integer(value)
    }
}

impl From<i64> for ObjectValue {
    fn from(value: i64) -> Self {
        ObjectValue::Long(value)
    }
}

impl From<f64> for ObjectValue {
    fn from(value: f64) -> Self {
        ObjectValue::Double(value)
    }
}

impl From<String> for ObjectValue {
    fn from(value: String) -> Self {
        ObjectValue::String(value)
    }
}

impl From<&str> for ObjectValue {
    fn from(value: &str) -> Self {
        ObjectValue::String(value.to_string())
    }
}

impl From<ParsedValue> for ObjectValue {
    fn from(value: ParsedValue) -> Self {
        match value {
            ParsedValue::Integer(v) => ObjectValue::Integer(v),
            ParsedValue::Long(v) => ObjectValue::Long(v),
            ParsedValue::Double(v) => ObjectValue::Double(v),
            ParsedValue::Text(v) => ObjectValue::String(v),
        }
    }
}

impl From<serde_json::Value> for ObjectValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Number(number) => {
                if let Some(v) = number.as_i64() {
                    match i32::try_from(v) {
                        Ok(v) => ObjectValue::Integer(v),
                        Err(_) => ObjectValue::Long(v),
                    }
                } else if let Some(v) = number.as_f64() {
                    ObjectValue::Double(v)
                } else {
                    ObjectValue::Other(Value::Number(number))
                }
            }
            Value::String(v) => ObjectValue::String(v),
            Value::Array(items) => {
                ObjectValue::List(items.into_iter().map(ObjectValue::from).collect())
            }
            Value::Object(map) => ObjectValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ObjectValue::from(v)))
                    .collect(),
            ),
            other => ObjectValue::Other(other),
        }
    }
}

/// 识别文本表示的数值类型
///
/// - `^[-+]?[0-9]+[.][0-9]+$` 为 Double
/// - `^[-+]?[0-9]+$` 且严格位于 32 位有符号整数范围内（不含两端）为 Integer，否则为 Long
/// - 其余（包括超出 64 位范围的整数）为 String
pub fn classify_text(content: &str) -> ObjectType {
    if DOUBLE_RE.is_match(content) {
        return ObjectType::Double;
    }
    if INTEGER_RE.is_match(content) {
        return match content.parse::<i64>() {
            Ok(n) if n < i64::from(i32::MAX) && n > i64::from(i32::MIN) => ObjectType::Integer,
            Ok(_) => ObjectType::Long,
            Err(_) => ObjectType::String,
        };
    }
    ObjectType::String
}

/// 值的类型标签，按 Integer、Long、Double、String、List、Map、Other 的顺序判断
pub fn classify_value(value: &ObjectValue) -> ObjectType {
    match value {
        ObjectValue::Integer(_) => ObjectType::Integer,
        ObjectValue::Long(_) => ObjectType::Long,
        ObjectValue::Double(_) => ObjectType::Double,
        ObjectValue::String(_) => ObjectType::String,
        ObjectValue::List(_) => ObjectType::List,
        ObjectValue::Map(_) => ObjectType::Map,
        ObjectValue::Other(_) => ObjectType::Other,
    }
}

/// 按 [`classify_text`] 的结果解析文本
pub fn parse_value(content: &str) -> ParsedValue {
    let parsed = match classify_text(content) {
        ObjectType::Integer => content.parse().ok().map(ParsedValue::Integer),
        ObjectType::Long => content.parse().ok().map(ParsedValue::Long),
        ObjectType::Double => content.parse().ok().map(ParsedValue::Double),
        _ => None,
    };
    parsed.unwrap_or_else(|| ParsedValue::Text(content.to_string()))
}
